//! [`RidClaims`], the plaintext bound inside an issued RID (spec §3, §4.8.2).

use serde::{Deserialize, Serialize};

use crate::organisation::UsageTier;

/// The claims bound inside a Recipient-Intended Descriptor.
///
/// Field order is fixed (`usage`, `recipient_organization`,
/// `recipient_scope`, `personal_id`) so that JSON-encoding the same claims
/// twice produces byte-identical plaintext (spec §4.8.2 step 1) — `serde`
/// serializes struct fields in declaration order, so this struct's field
/// order *is* the wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RidClaims {
    /// The usage ceiling this RID was issued under.
    pub usage: UsageTier,
    /// The recipient organisation, as `"ura:<digits>"`.
    pub recipient_organization: String,
    /// The recipient's requested scope.
    pub recipient_scope: String,
    /// The canonical `"CC:type:value"` personal id the RID binds to.
    pub personal_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_order_is_fixed() {
        let claims = RidClaims {
            usage: UsageTier::Rp,
            recipient_organization: "ura:87654321".into(),
            recipient_scope: "nvi".into(),
            personal_id: "NL:bsn:123456782".into(),
        };
        let json = serde_json::to_string(&claims).unwrap();
        assert_eq!(
            json,
            r#"{"usage":"rp","recipient_organization":"ura:87654321","recipient_scope":"nvi","personal_id":"NL:bsn:123456782"}"#
        );
    }

    #[test]
    fn roundtrips_through_json() {
        let claims = RidClaims {
            usage: UsageTier::Bsn,
            recipient_organization: "ura:12345678".into(),
            recipient_scope: "*".into(),
            personal_id: "NL:bsn:123456782".into(),
        };
        let json = serde_json::to_string(&claims).unwrap();
        let back: RidClaims = serde_json::from_str(&json).unwrap();
        assert_eq!(claims, back);
    }
}
