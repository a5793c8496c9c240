//! Peripheral ownership registry
//!
//! A USART can only shift out one byte stream at a time, so at most one
//! [`SerialPort`](crate::serial::SerialPort) may own a given instance. The
//! registry hands out a [`Claim`] token per instance; a second claim for the
//! same instance fails until the first token is dropped.

use core::fmt;

use courier_hal::UsartId;
use portable_atomic::{AtomicU8, Ordering};

/// The requested instance is already owned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlreadyClaimed(pub UsartId);

impl fmt::Display for AlreadyClaimed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is already claimed", self.0.name())
    }
}

/// Bitmask of claimed USART instances
///
/// Lock-free, so it can live in a `static` and be shared freely.
pub struct PeripheralClaims {
    claimed: AtomicU8,
}

impl Default for PeripheralClaims {
    fn default() -> Self {
        Self::new()
    }
}

impl PeripheralClaims {
    /// Create a registry with nothing claimed
    pub const fn new() -> Self {
        Self {
            claimed: AtomicU8::new(0),
        }
    }

    /// Claim exclusive ownership of `id`
    pub fn claim(&self, id: UsartId) -> Result<Claim<'_>, AlreadyClaimed> {
        let mask = 1 << id.index();
        let previous = self.claimed.fetch_or(mask, Ordering::AcqRel);
        if previous & mask != 0 {
            return Err(AlreadyClaimed(id));
        }
        Ok(Claim { registry: self, id })
    }

    /// Check if an instance is currently owned
    pub fn is_claimed(&self, id: UsartId) -> bool {
        self.claimed.load(Ordering::Acquire) & (1 << id.index()) != 0
    }

    fn release(&self, id: UsartId) {
        self.claimed.fetch_and(!(1 << id.index()), Ordering::AcqRel);
    }
}

/// Proof of exclusive ownership of one USART instance
///
/// Released when dropped. On target the port holding it lives forever,
/// so in practice the instance stays claimed until reset.
pub struct Claim<'a> {
    registry: &'a PeripheralClaims,
    id: UsartId,
}

impl Claim<'_> {
    /// Instance this claim owns
    pub fn id(&self) -> UsartId {
        self.id
    }
}

impl fmt::Debug for Claim<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Claim").field(&self.id).finish()
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_once() {
        let claims = PeripheralClaims::new();
        assert!(!claims.is_claimed(UsartId::Usart1));

        let claim = claims.claim(UsartId::Usart1).unwrap();
        assert_eq!(claim.id(), UsartId::Usart1);
        assert!(claims.is_claimed(UsartId::Usart1));
    }

    #[test]
    fn test_double_claim_rejected() {
        let claims = PeripheralClaims::new();
        let _first = claims.claim(UsartId::Usart1).unwrap();

        let second = claims.claim(UsartId::Usart1);
        assert_eq!(second.unwrap_err(), AlreadyClaimed(UsartId::Usart1));

        // Failed claim must not disturb the existing one
        assert!(claims.is_claimed(UsartId::Usart1));
    }

    #[test]
    fn test_instances_are_independent() {
        let claims = PeripheralClaims::new();
        let _usart1 = claims.claim(UsartId::Usart1).unwrap();
        let _usart2 = claims.claim(UsartId::Usart2).unwrap();

        assert!(claims.is_claimed(UsartId::Usart1));
        assert!(claims.is_claimed(UsartId::Usart2));
        assert!(!claims.is_claimed(UsartId::Usart3));
    }

    #[test]
    fn test_drop_releases() {
        let claims = PeripheralClaims::new();
        let claim = claims.claim(UsartId::Usart3).unwrap();
        drop(claim);

        assert!(!claims.is_claimed(UsartId::Usart3));
        assert!(claims.claim(UsartId::Usart3).is_ok());
    }

    #[test]
    fn test_static_registry() {
        static CLAIMS: PeripheralClaims = PeripheralClaims::new();

        let claim = CLAIMS.claim(UsartId::Usart2).unwrap();
        assert!(CLAIMS.claim(UsartId::Usart2).is_err());
        drop(claim);
        assert!(!CLAIMS.is_claimed(UsartId::Usart2));
    }
}
