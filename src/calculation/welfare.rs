//! Employer welfare contributions: death/disability cover, mutual health
//! insurance and the flat levy (forfait social) assessed on them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::MutualInsurance;

use super::contribution_table::{DEATH_COVER_RULE, SUPPLEMENTARY_COVER_RULE, find_rule};
use super::contributions::{round_cents, split_tranches};

/// Employer and employee shares of the mutual health insurance premium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MutualShares {
    /// Full monthly premium.
    pub premium: Decimal,
    /// Employer share, rounded to the cent.
    pub employer: Decimal,
    /// Employee share, rounded to the cent.
    pub employee: Decimal,
}

/// Computes the mutual insurance shares; all zero when the employee is not covered.
///
/// # Examples
///
/// ```
/// use portage_engine::calculation::mutual_shares;
/// use portage_engine::config::SalaryConfiguration;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let config = SalaryConfiguration::default();
/// let shares = mutual_shares(config.pmss, &config.mutual_insurance, true);
/// // 4005 × 1.5% = 60.075, split 50/50
/// assert_eq!(shares.employer, Decimal::from_str("30.04").unwrap());
/// assert_eq!(shares.employee, Decimal::from_str("30.04").unwrap());
/// ```
pub fn mutual_shares(pmss: Decimal, contract: &MutualInsurance, active: bool) -> MutualShares {
    if !active {
        return MutualShares::default();
    }

    let premium = pmss * contract.rate_of_pmss;
    MutualShares {
        premium,
        employer: round_cents(premium * contract.employer_share),
        employee: round_cents(premium * (Decimal::ONE - contract.employer_share)),
    }
}

/// Employer welfare contributions assessed on a gross salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelfareContributions {
    /// Death/disability cover on tranche A.
    pub death_cover: Decimal,
    /// Supplementary cover on tranche B.
    pub supplementary_cover: Decimal,
    /// Employer mutual insurance share.
    pub mutual: Decimal,
}

impl WelfareContributions {
    /// Sum of the three employer contributions.
    pub fn total(&self) -> Decimal {
        self.death_cover + self.supplementary_cover + self.mutual
    }
}

/// Computes the employer welfare contributions that enter the CSG/CRDS base.
///
/// Rates come from the contribution table's death-cover and
/// supplementary-cover rules.
pub fn welfare_contributions(
    gross: Decimal,
    pmss: Decimal,
    mutual_employer_share: Decimal,
) -> WelfareContributions {
    let (tranche_a, tranche_b) = split_tranches(gross, pmss);

    let death_rate = find_rule(DEATH_COVER_RULE).map_or(Decimal::ZERO, |r| r.employer_rate);
    let supplementary_rate =
        find_rule(SUPPLEMENTARY_COVER_RULE).map_or(Decimal::ZERO, |r| r.employer_rate);

    let supplementary_cover = if tranche_b.is_zero() {
        Decimal::ZERO
    } else {
        round_cents(tranche_b * supplementary_rate)
    };

    WelfareContributions {
        death_cover: round_cents(tranche_a * death_rate),
        supplementary_cover,
        mutual: mutual_employer_share,
    }
}

/// Flat levy (forfait social) on employer welfare contributions.
pub fn welfare_levy(welfare_total: Decimal, levy_rate: Decimal) -> Decimal {
    round_cents(welfare_total * levy_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SalaryConfiguration;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_mutual_shares_inactive_are_zero() {
        let config = SalaryConfiguration::default();
        let shares = mutual_shares(config.pmss, &config.mutual_insurance, false);

        assert_eq!(shares, MutualShares::default());
    }

    #[test]
    fn test_mutual_shares_uneven_split() {
        let contract = MutualInsurance {
            rate_of_pmss: dec("0.015"),
            employer_share: dec("0.60"),
        };
        let shares = mutual_shares(dec("4005"), &contract, true);

        // 60.075 × 60% = 36.045 (banker's rounding to even)
        assert_eq!(shares.employer, dec("36.04"));
        // 60.075 × 40% = 24.03
        assert_eq!(shares.employee, dec("24.03"));
    }

    #[test]
    fn test_welfare_below_ceiling_has_no_supplementary_cover() {
        let welfare = welfare_contributions(dec("3000"), dec("4005"), dec("30.04"));

        // 3000 × 1.59% = 47.70
        assert_eq!(welfare.death_cover, dec("47.70"));
        assert_eq!(welfare.supplementary_cover, Decimal::ZERO);
        assert_eq!(welfare.total(), dec("77.74"));
    }

    #[test]
    fn test_welfare_above_ceiling_includes_supplementary_cover() {
        let welfare = welfare_contributions(dec("6000"), dec("4005"), dec("30.04"));

        // 4005 × 1.59% = 63.6795
        assert_eq!(welfare.death_cover, dec("63.68"));
        // 1995 × 0.73% = 14.5635
        assert_eq!(welfare.supplementary_cover, dec("14.56"));
        assert_eq!(welfare.total(), dec("108.28"));
    }

    #[test]
    fn test_welfare_levy_is_eight_percent_rounded() {
        // 108.28 × 8% = 8.6624
        assert_eq!(welfare_levy(dec("108.28"), dec("0.08")), dec("8.66"));
    }
}
