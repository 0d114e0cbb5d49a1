use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::date::months_before;
use crate::analytics::math::mean;
use crate::analytics::policy::{ANALYTICS_POLICY_V1, ANONYMOUS_DONOR, AnalyticsPolicy};
use crate::clock::Clock;
use crate::identity::{Member, find_by_email};
use crate::ledger::{MonthKey, Transaction};

/// Who gave a gift, as far as the ledger can tell.
///
/// Gifts group on `key`, the donor name with whitespace collapsed and case
/// folded. `member_id` is an advisory link to the member directory and never
/// affects grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DonorIdentity {
    pub display_name: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
}

impl DonorIdentity {
    pub fn from_donor_name(raw: Option<&str>) -> Self {
        let key = raw.map(donor_key).unwrap_or_default();
        if key.is_empty() {
            return Self::anonymous();
        }
        let display_name = raw.map(str::trim).unwrap_or_default().to_string();
        Self {
            display_name,
            key,
            member_id: None,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            display_name: ANONYMOUS_DONOR.to_string(),
            key: ANONYMOUS_DONOR.to_lowercase(),
            member_id: None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.key == ANONYMOUS_DONOR.to_lowercase()
    }
}

fn donor_key(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonorProfile {
    pub identity: DonorIdentity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    pub total_given: f64,
    pub transaction_count: usize,
    pub first_gift_date: NaiveDate,
    pub last_gift_date: NaiveDate,
    pub categories: Vec<String>,
    pub monthly_giving: BTreeMap<MonthKey, f64>,
    /// Mean over months with at least one gift, not over the whole span.
    pub monthly_average: f64,
    pub is_regular: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GivingTrend {
    pub month: MonthKey,
    pub amount: f64,
    pub donor_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DonorRetention {
    pub retained: usize,
    pub lapsed: usize,
    pub new: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonorAnalytics {
    pub total_donors: usize,
    pub active_donors: usize,
    pub new_donors_this_month: usize,
    pub total_giving: f64,
    pub average_gift_size: f64,
    pub giving_trends: Vec<GivingTrend>,
    pub donor_retention: DonorRetention,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonorReport {
    pub as_of: NaiveDate,
    pub profiles: Vec<DonorProfile>,
    pub analytics: DonorAnalytics,
}

pub struct DonorProfileBuilder<'a> {
    clock: &'a dyn Clock,
    members: &'a [Member],
    policy: AnalyticsPolicy,
}

impl<'a> DonorProfileBuilder<'a> {
    pub fn new(clock: &'a dyn Clock) -> Self {
        Self {
            clock,
            members: &[],
            policy: ANALYTICS_POLICY_V1,
        }
    }

    /// Resolves `member_id` on each profile from the donor contact email.
    pub fn with_members(mut self, members: &'a [Member]) -> Self {
        self.members = members;
        self
    }

    pub fn build(&self, transactions: &[Transaction]) -> DonorReport {
        let today = self.clock.today();
        let gifts = transactions
            .iter()
            .filter(|row| row.is_income())
            .collect::<Vec<&Transaction>>();
        tracing::debug!(
            input = transactions.len(),
            gifts = gifts.len(),
            today = %today,
            "building donor profiles"
        );

        let mut groups: BTreeMap<String, (DonorIdentity, Vec<&Transaction>)> = BTreeMap::new();
        for gift in gifts.iter().copied() {
            let identity = DonorIdentity::from_donor_name(gift.donor_name.as_deref());
            groups
                .entry(identity.key.clone())
                .or_insert_with(|| (identity, Vec::new()))
                .1
                .push(gift);
        }

        let mut profiles = groups
            .into_values()
            .filter_map(|(identity, rows)| self.profile(identity, rows))
            .collect::<Vec<DonorProfile>>();
        profiles.sort_by(|left, right| {
            right
                .total_given
                .total_cmp(&left.total_given)
                .then_with(|| left.identity.key.cmp(&right.identity.key))
        });

        let analytics = self.analytics(&profiles, &gifts, today);
        DonorReport {
            as_of: today,
            profiles,
            analytics,
        }
    }

    fn profile(
        &self,
        mut identity: DonorIdentity,
        mut rows: Vec<&Transaction>,
    ) -> Option<DonorProfile> {
        rows.sort_by_key(|row| row.date);
        let first_gift_date = rows.first()?.date;
        let last_gift_date = rows.last()?.date;

        let mut total_given = 0.0;
        let mut categories = BTreeSet::new();
        let mut monthly_giving: BTreeMap<MonthKey, f64> = BTreeMap::new();
        for row in &rows {
            total_given += row.amount;
            categories.insert(row.category.clone());
            *monthly_giving.entry(row.month()).or_insert(0.0) += row.amount;
        }

        let contact = rows
            .iter()
            .filter_map(|row| row.donor_contact.as_deref())
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(str::to_string);
        // Anonymous gifts never link to a member.
        if !identity.is_anonymous()
            && let Some(email) = contact.as_deref()
            && let Some(member) = find_by_email(self.members, email)
        {
            identity.member_id = Some(member.id.clone());
        }

        Some(DonorProfile {
            identity,
            contact,
            total_given,
            transaction_count: rows.len(),
            first_gift_date,
            last_gift_date,
            categories: categories.into_iter().collect(),
            monthly_average: mean(monthly_giving.values().copied()),
            is_regular: monthly_giving.len() >= self.policy.regular_donor_min_months,
            monthly_giving,
        })
    }

    fn analytics(
        &self,
        profiles: &[DonorProfile],
        gifts: &[&Transaction],
        today: NaiveDate,
    ) -> DonorAnalytics {
        let active_since = months_before(today, self.policy.active_donor_months);
        let this_month = MonthKey::from_date(today);

        let total_donors = profiles.len();
        let active_donors = profiles
            .iter()
            .filter(|profile| profile.last_gift_date >= active_since)
            .count();
        let new_donors_this_month = profiles
            .iter()
            .filter(|profile| this_month.contains(profile.first_gift_date))
            .count();
        let total_giving = profiles.iter().map(|profile| profile.total_given).sum::<f64>();
        let average_gift_size = if total_donors == 0 {
            0.0
        } else {
            total_giving / total_donors as f64
        };

        // Re-derived from the raw gifts rather than from the profiles.
        let mut by_month: BTreeMap<MonthKey, (f64, BTreeSet<String>)> = BTreeMap::new();
        for gift in gifts {
            let bucket = by_month.entry(gift.month()).or_default();
            bucket.0 += gift.amount;
            bucket
                .1
                .insert(DonorIdentity::from_donor_name(gift.donor_name.as_deref()).key);
        }

        let donor_retention = retention(&by_month);
        let skip = by_month.len().saturating_sub(self.policy.trend_window_months);
        let giving_trends = by_month
            .into_iter()
            .skip(skip)
            .map(|(month, (amount, donors))| GivingTrend {
                month,
                amount,
                donor_count: donors.len(),
            })
            .collect::<Vec<GivingTrend>>();

        DonorAnalytics {
            total_donors,
            active_donors,
            new_donors_this_month,
            total_giving,
            average_gift_size,
            giving_trends,
            donor_retention,
        }
    }
}

fn retention(by_month: &BTreeMap<MonthKey, (f64, BTreeSet<String>)>) -> DonorRetention {
    let mut latest_first = by_month.values().rev();
    let (Some((_, current)), Some((_, previous))) = (latest_first.next(), latest_first.next())
    else {
        return DonorRetention::default();
    };
    DonorRetention {
        retained: current.intersection(previous).count(),
        lapsed: previous.difference(current).count(),
        new: current.difference(previous).count(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{DonorIdentity, DonorProfileBuilder};
    use crate::clock::FixedClock;
    use crate::identity::Member;
    use crate::ledger::{Transaction, TransactionType};

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap_or(NaiveDate::MIN)
    }

    fn gift(day: &str, donor: Option<&str>, amount: f64) -> Transaction {
        Transaction {
            id: format!("txn_{day}_{}_{amount}", donor.unwrap_or("anon")),
            date: date(day),
            description: "Gift".to_string(),
            category: "Tithes".to_string(),
            amount,
            transaction_type: TransactionType::Income,
            donor_name: donor.map(str::to_string),
            donor_contact: None,
        }
    }

    #[test]
    fn blank_and_missing_names_share_the_anonymous_identity() {
        let clock = FixedClock(date("2024-06-15"));
        let rows = vec![
            gift("2024-06-01", None, 10.0),
            gift("2024-06-02", Some("   "), 15.0),
        ];
        let report = DonorProfileBuilder::new(&clock).build(&rows);
        assert_eq!(report.profiles.len(), 1);
        assert_eq!(report.profiles[0].identity, DonorIdentity::anonymous());
        assert_eq!(report.profiles[0].identity.display_name, "Anonymous");
        assert_eq!(report.profiles[0].total_given, 25.0);
    }

    #[test]
    fn anonymous_gifts_never_link_to_a_member() {
        let clock = FixedClock(date("2024-06-15"));
        let members = vec![Member {
            id: "m1".to_string(),
            name: "Ann".to_string(),
            email: Some("ann@example.org".to_string()),
        }];
        let mut row = gift("2024-06-01", None, 10.0);
        row.donor_contact = Some("ann@example.org".to_string());
        let report = DonorProfileBuilder::new(&clock)
            .with_members(&members)
            .build(&[row]);
        assert!(report.profiles[0].identity.is_anonymous());
        assert_eq!(report.profiles[0].identity.member_id, None);
        assert_eq!(report.profiles[0].contact.as_deref(), Some("ann@example.org"));
    }

    #[test]
    fn names_group_after_whitespace_and_case_folding() {
        let clock = FixedClock(date("2024-06-15"));
        let rows = vec![
            gift("2024-05-01", Some("Mary  Smith"), 10.0),
            gift("2024-06-01", Some(" mary smith"), 20.0),
        ];
        let report = DonorProfileBuilder::new(&clock).build(&rows);
        assert_eq!(report.profiles.len(), 1);
        assert_eq!(report.profiles[0].identity.display_name, "Mary  Smith");
        assert_eq!(report.profiles[0].transaction_count, 2);
    }

    #[test]
    fn expenses_never_create_donors() {
        let clock = FixedClock(date("2024-06-15"));
        let mut refund = gift("2024-06-01", Some("Vendor"), 10.0);
        refund.transaction_type = TransactionType::Expense;
        let report = DonorProfileBuilder::new(&clock).build(&[refund]);
        assert!(report.profiles.is_empty());
        assert_eq!(report.analytics.average_gift_size, 0.0);
    }

    #[test]
    fn regularity_requires_three_distinct_months() {
        let clock = FixedClock(date("2024-06-15"));
        let rows = vec![
            gift("2024-01-07", Some("Ann"), 10.0),
            gift("2024-01-14", Some("Ann"), 10.0),
            gift("2024-02-07", Some("Ann"), 10.0),
            gift("2024-01-07", Some("Bo"), 10.0),
            gift("2024-02-07", Some("Bo"), 10.0),
            gift("2024-03-07", Some("Bo"), 40.0),
        ];
        let report = DonorProfileBuilder::new(&clock).build(&rows);
        let ann = report.profiles.iter().find(|p| p.identity.key == "ann");
        let bo = report.profiles.iter().find(|p| p.identity.key == "bo");
        assert!(ann.is_some_and(|profile| !profile.is_regular));
        assert!(bo.is_some_and(|profile| profile.is_regular));
        if let Some(profile) = ann {
            assert_eq!(profile.monthly_average, 15.0);
        }
        assert_eq!(report.profiles[0].identity.key, "bo");
    }

    #[test]
    fn active_and_new_donors_follow_the_injected_clock() {
        let clock = FixedClock(date("2024-08-31"));
        let rows = vec![
            gift("2024-02-28", Some("Old"), 10.0),
            gift("2024-02-29", Some("Edge"), 10.0),
            gift("2024-08-02", Some("Fresh"), 10.0),
        ];
        let report = DonorProfileBuilder::new(&clock).build(&rows);
        assert_eq!(report.analytics.total_donors, 3);
        assert_eq!(report.analytics.active_donors, 2);
        assert_eq!(report.analytics.new_donors_this_month, 1);
        assert_eq!(report.analytics.average_gift_size, 10.0);
    }

    #[test]
    fn retention_compares_the_two_latest_populated_months() {
        let clock = FixedClock(date("2024-06-15"));
        let rows = vec![
            gift("2024-01-07", Some("Ann"), 10.0),
            gift("2024-04-07", Some("Ann"), 10.0),
            gift("2024-04-08", Some("Bo"), 10.0),
            gift("2024-06-07", Some("Ann"), 10.0),
            gift("2024-06-09", Some("Cy"), 10.0),
            gift("2024-06-10", None, 5.0),
        ];
        let report = DonorProfileBuilder::new(&clock).build(&rows);
        let retention = report.analytics.donor_retention;
        assert_eq!(retention.retained, 1);
        assert_eq!(retention.lapsed, 1);
        assert_eq!(retention.new, 2);
        assert_eq!(report.analytics.giving_trends.len(), 3);
        assert_eq!(report.analytics.giving_trends[2].donor_count, 3);
        assert_eq!(report.analytics.giving_trends[2].amount, 25.0);
    }

    #[test]
    fn retention_over_one_month_is_all_zero() {
        let clock = FixedClock(date("2024-06-15"));
        let rows = vec![gift("2024-06-07", Some("Ann"), 10.0)];
        let report = DonorProfileBuilder::new(&clock).build(&rows);
        assert_eq!(report.analytics.donor_retention.retained, 0);
        assert_eq!(report.analytics.donor_retention.lapsed, 0);
        assert_eq!(report.analytics.donor_retention.new, 0);
    }

    #[test]
    fn member_link_comes_from_contact_email() {
        let clock = FixedClock(date("2024-06-15"));
        let members = vec![Member {
            id: "mem_7".to_string(),
            name: "Ann Lee".to_string(),
            email: Some("ann@example.org".to_string()),
        }];
        let mut row = gift("2024-06-07", Some("Ann"), 10.0);
        row.donor_contact = Some(" ANN@example.org ".to_string());
        let report = DonorProfileBuilder::new(&clock)
            .with_members(&members)
            .build(&[row]);
        assert_eq!(report.profiles[0].identity.member_id.as_deref(), Some("mem_7"));
        assert_eq!(report.profiles[0].identity.key, "ann");
    }
}
