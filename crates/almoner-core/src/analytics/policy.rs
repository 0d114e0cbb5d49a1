/// Window sizes and thresholds shared by the analytics engines.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsPolicy {
    /// Monthly buckets retained in summary trends and donor giving trends.
    pub trend_window_months: usize,
    /// Leading entries of the category breakdown reported as top categories.
    pub top_categories: usize,
    /// Trailing months in which a last gift counts as an active donor.
    pub active_donor_months: u32,
    /// Distinct giving months needed for a donor to count as regular.
    pub regular_donor_min_months: usize,
}

pub const ANALYTICS_POLICY_V1: AnalyticsPolicy = AnalyticsPolicy {
    trend_window_months: 12,
    top_categories: 10,
    active_donor_months: 6,
    regular_donor_min_months: 3,
};

/// Literal identity used for income with no donor name.
pub const ANONYMOUS_DONOR: &str = "Anonymous";

#[cfg(test)]
mod tests {
    use super::ANALYTICS_POLICY_V1;

    #[test]
    fn windows_are_positive() {
        assert!(ANALYTICS_POLICY_V1.trend_window_months > 0);
        assert!(ANALYTICS_POLICY_V1.top_categories > 0);
        assert!(ANALYTICS_POLICY_V1.active_donor_months > 0);
        assert!(ANALYTICS_POLICY_V1.regular_donor_min_months > 0);
    }
}
