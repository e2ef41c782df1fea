//! Transaction search: parameter validation and result summaries.
//!
//! A search is keyed by transaction id, by amount, or by a bare date range.
//! Amount takes precedence over id when both are given. Results come back
//! as raw log hits; [`TransactionSummary`] condenses the first hit into the
//! fields an operator needs at a glance.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use wirewatch_adapters::logsearch::LogSearchClient;
use wirewatch_adapters::AdapterError;
use wirewatch_types::{RawTransaction, TransactionDetail};

/// Transaction ids are exactly this many upper-case alphanumerics.
pub const TRANSACTION_ID_LEN: usize = 16;

/// Parameters of one transaction search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub transaction_id: Option<String>,
    pub amount: Option<String>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
}

/// Which backend endpoint a search goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    ById,
    ByAmount,
}

impl SearchParams {
    /// Search by transaction id. The id is upper-cased.
    pub fn by_id(id: &str) -> Self {
        Self {
            transaction_id: non_blank(id).map(|s| s.to_uppercase()),
            ..Self::default()
        }
    }

    pub fn by_amount(amount: &str) -> Self {
        Self {
            amount: non_blank(amount).map(str::to_string),
            ..Self::default()
        }
    }

    /// Also match on amount. Amount takes precedence over the id.
    pub fn with_amount(mut self, amount: &str) -> Self {
        self.amount = non_blank(amount).map(str::to_string);
        self
    }

    /// Interpret text typed at the search prompt.
    ///
    /// A well-formed transaction id searches by id; any other number
    /// searches by amount; everything else is taken as a (possibly invalid) id.
    pub fn from_query(query: &str) -> Self {
        let query = query.trim();
        if is_valid_transaction_id(&query.to_uppercase()) {
            Self::by_id(query)
        } else if query.parse::<f64>().is_ok_and(f64::is_finite) {
            Self::by_amount(query)
        } else {
            Self::by_id(query)
        }
    }

    /// Restrict the search to a date range. Either bound may be open.
    pub fn with_dates(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.date_start = start.and_then(non_blank).map(str::to_string);
        self.date_end = end.and_then(non_blank).map(str::to_string);
        self
    }

    pub fn has_valid_id(&self) -> bool {
        self.transaction_id.as_deref().is_some_and(is_valid_transaction_id)
    }

    /// An id was given but is not a well-formed transaction id.
    pub fn has_invalid_id(&self) -> bool {
        self.transaction_id.is_some() && !self.has_valid_id()
    }

    fn has_amount(&self) -> bool {
        self.amount.as_deref().is_some_and(|a| !a.trim().is_empty())
    }

    fn has_dates(&self) -> bool {
        self.date_start.is_some() || self.date_end.is_some()
    }

    /// Whether there is enough to run a search.
    pub fn is_enabled(&self) -> bool {
        self.has_valid_id() || self.has_amount() || self.has_dates()
    }

    /// Endpoint to use, or `None` when the search is not enabled.
    pub fn mode(&self) -> Option<SearchMode> {
        if !self.is_enabled() {
            None
        } else if self.has_amount() {
            Some(SearchMode::ByAmount)
        } else {
            Some(SearchMode::ById)
        }
    }

    /// Stable key identifying this search, used as its result id.
    pub fn search_key(&self) -> String {
        if let Some(id) = &self.transaction_id {
            return id.clone();
        }
        if let Some(amount) = &self.amount {
            return format!("amount_{}", amount);
        }
        if self.has_dates() {
            return format!(
                "{}_to_{}",
                self.date_start.as_deref().unwrap_or("any"),
                self.date_end.as_deref().unwrap_or("any")
            );
        }
        String::new()
    }
}

/// Exactly 16 characters of `A-Z` and `0-9`.
pub fn is_valid_transaction_id(id: &str) -> bool {
    id.len() == TRANSACTION_ID_LEN
        && id.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

fn non_blank(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

/// Outcome of a transaction as logged by the screening engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionStatus {
    Approved,
    Rejected,
    Pending,
}

impl TransactionStatus {
    /// Map an action code. Unknown and missing codes are pending.
    pub fn from_action_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "A" => TransactionStatus::Approved,
            "R" => TransactionStatus::Rejected,
            _ => TransactionStatus::Pending,
        }
    }
}

/// Condensed view of a transaction, built from the first search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub id: String,
    pub status: TransactionStatus,
    pub amount: f64,
    pub currency: String,
    /// RFC 3339, UTC, millisecond precision.
    pub date: String,
    pub reference: String,
    pub source: String,
    pub counterparty_country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    pub metadata: BTreeMap<String, String>,
}

impl TransactionSummary {
    /// Summarize `results` under `search_key`, stamping missing dates with `now`.
    pub fn build(search_key: &str, results: &[TransactionDetail], now: DateTime<Utc>) -> Self {
        let empty = RawTransaction::default();
        let raw = results.first().map_or(&empty, |r| &r.raw);

        let metadata = [
            ("destination", &raw.smh_dest),
            ("entryMethod", &raw.dba_entry_method),
            ("approvalType", &raw.dba_approval_type_req),
            ("transactionType", &raw.tbt_tran_type),
            ("scheduleRef", &raw.tbt_sch_ref_num),
            ("approvedBy", &raw.dba_approved_by_userid2),
            ("correlationId", &raw.bcc_cps_correlation),
            ("customerAccount", &raw.aqq_cust_a_num),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();

        Self {
            id: search_key.to_string(),
            status: TransactionStatus::from_action_code(&raw.rrr_action_code),
            amount: parse_amount(first_of(&[&raw.tbt_billing_amt, &raw.tpp_tran_amt], "")),
            currency: first_of(&[&raw.aqq_billing_curr_code, &raw.tpp_curr_code], "USD").to_string(),
            date: transaction_date(raw, now).to_rfc3339_opts(SecondsFormat::Millis, true),
            reference: first_of(&[&raw.tbt_ref_num], search_key).to_string(),
            source: first_of(&[&raw.smh_source], "Unknown").to_string(),
            counterparty_country: first_of(
                &[
                    &raw.tpp_cntry_code,
                    &raw.tpp_bank_cntry_code,
                    &raw.xqo_cust_cntry_code,
                ],
                "US",
            )
            .to_string(),
            score: parse_leading_int(&raw.rrr_score),
            metadata,
        }
    }
}

fn first_of<'a>(candidates: &[&'a String], fallback: &'a str) -> &'a str {
    candidates
        .iter()
        .map(|s| s.as_str())
        .find(|s| !s.is_empty())
        .unwrap_or(fallback)
}

/// Parse an amount like `"1,250.00"`. Anything unparseable is 0.
pub fn parse_amount(raw: &str) -> f64 {
    raw.replace(',', "")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Leading signed integer of `raw`, ignoring any trailing text.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let end = raw
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(raw.len(), |(i, _)| i);
    raw[..end].parse().ok()
}

/// When the transaction happened.
///
/// Prefers the record-creation timestamp, then the alternate date and time
/// columns, then the primary ones. Falls back to `now`.
pub fn transaction_date(raw: &RawTransaction, now: DateTime<Utc>) -> DateTime<Utc> {
    parse_timestamp(&raw.rec_crt_ts)
        .or_else(|| combine_date_time(&raw.rqo_tran_date_alt, &raw.rqo_tran_time_alt))
        .or_else(|| combine_date_time(&raw.rqo_tran_date, &raw.rqo_tran_time))
        .unwrap_or(now)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Join a date column (possibly carrying a time part) with a time column.
fn combine_date_time(date: &str, time: &str) -> Option<DateTime<Utc>> {
    let date = date.trim().split(' ').next().unwrap_or_default();
    let time = time.trim();
    DateTime::parse_from_rfc3339(&format!("{}T{}Z", date, time))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Why a search produced no results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchFailure {
    /// The id is malformed or the backend rejected it.
    #[error("invalid transaction id (expected {TRANSACTION_ID_LEN} characters A-Z, 0-9)")]
    InvalidId,
    #[error("no matching transaction")]
    NotFound,
    /// Not enough parameters to search.
    #[error("nothing to search for")]
    Disabled,
    #[error("search failed: {0}")]
    Backend(String),
}

impl From<AdapterError> for SearchFailure {
    fn from(err: AdapterError) -> Self {
        match err {
            AdapterError::InvalidRequest(_) => SearchFailure::InvalidId,
            AdapterError::NotFound(_) => SearchFailure::NotFound,
            other => SearchFailure::Backend(other.to_string()),
        }
    }
}

/// All hits for one search plus their summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub results: Vec<TransactionDetail>,
    pub summary: TransactionSummary,
}

impl SearchResult {
    pub fn new(search_key: String, results: Vec<TransactionDetail>, now: DateTime<Utc>) -> Self {
        let summary = TransactionSummary::build(&search_key, &results, now);
        Self {
            id: search_key,
            results,
            summary,
        }
    }

    /// Systems that logged this transaction, for highlighting in the diagram.
    pub fn matched_systems(&self) -> BTreeSet<String> {
        self.results
            .iter()
            .filter(|r| !r.ait_number.is_empty())
            .map(|r| r.ait_number.clone())
            .collect()
    }
}

/// Run a search against the backend.
pub async fn execute(
    client: &LogSearchClient,
    params: &SearchParams,
) -> Result<SearchResult, SearchFailure> {
    if params.has_invalid_id() && !params.has_amount() {
        return Err(SearchFailure::InvalidId);
    }
    let mode = params.mode().ok_or(SearchFailure::Disabled)?;

    let key = params.search_key();
    let start = params.date_start.as_deref();
    let end = params.date_end.as_deref();
    debug!("transaction search {:?} for '{}'", mode, key);

    let hits = match mode {
        SearchMode::ByAmount => {
            let amount = params.amount.as_deref().unwrap_or_default();
            client.transaction_by_amount(amount, start, end).await?
        }
        SearchMode::ById => {
            let id = params.transaction_id.as_deref().unwrap_or_default();
            client.transaction_by_id(id, start, end).await?
        }
    };

    info!("transaction search '{}' returned {} hits", key, hits.len());
    Ok(SearchResult::new(key, hits, Utc::now()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn hit(raw: RawTransaction) -> TransactionDetail {
        TransactionDetail {
            ait_number: "11554".into(),
            raw,
            ..Default::default()
        }
    }

    #[test]
    fn test_transaction_id_validation() {
        assert!(is_valid_transaction_id("ABCDEF0123456789"));
        assert!(!is_valid_transaction_id("abcdef0123456789"));
        assert!(!is_valid_transaction_id("ABCDEF012345678"));
        assert!(!is_valid_transaction_id("ABCDEF01234567890"));
        assert!(!is_valid_transaction_id("ABCDEF01234567-9"));
    }

    #[test]
    fn test_id_is_upper_cased() {
        let params = SearchParams::by_id(" abcdef0123456789 ");
        assert_eq!(params.transaction_id.as_deref(), Some("ABCDEF0123456789"));
        assert!(params.has_valid_id());
        assert_eq!(params.mode(), Some(SearchMode::ById));
    }

    #[test]
    fn test_enabled_rules() {
        assert!(!SearchParams::default().is_enabled());
        assert!(!SearchParams::by_id("SHORT").is_enabled());
        assert!(SearchParams::by_id("SHORT").has_invalid_id());
        assert!(SearchParams::by_amount("100.00").is_enabled());
        assert!(!SearchParams::by_amount("   ").is_enabled());
        assert!(SearchParams::default()
            .with_dates(Some("2024-01-01"), None)
            .is_enabled());
    }

    #[test]
    fn test_amount_takes_precedence() {
        let params = SearchParams {
            transaction_id: Some("ABCDEF0123456789".into()),
            amount: Some("250".into()),
            ..Default::default()
        };
        assert_eq!(params.mode(), Some(SearchMode::ByAmount));
    }

    #[test]
    fn test_with_amount_keeps_id() {
        let p = SearchParams::by_id("AB12CD34EF56GH78").with_amount(" 99.5 ");
        assert_eq!(p.transaction_id.as_deref(), Some("AB12CD34EF56GH78"));
        assert_eq!(p.amount.as_deref(), Some("99.5"));
        assert_eq!(p.mode(), Some(SearchMode::ByAmount));
        assert_eq!(SearchParams::default().with_amount("  ").amount, None);
    }

    #[test]
    fn test_from_query() {
        let p = SearchParams::from_query(" ab12cd34ef56gh78 ");
        assert_eq!(p.transaction_id.as_deref(), Some("AB12CD34EF56GH78"));
        assert_eq!(p.mode(), Some(SearchMode::ById));

        // sixteen digits is an id, not an amount
        let p = SearchParams::from_query("1234567890123456");
        assert!(p.has_valid_id());
        assert!(p.amount.is_none());

        let p = SearchParams::from_query("2500.75");
        assert_eq!(p.amount.as_deref(), Some("2500.75"));
        assert_eq!(p.mode(), Some(SearchMode::ByAmount));

        let p = SearchParams::from_query("nope");
        assert!(p.has_invalid_id());
        assert!(!p.is_enabled());
    }

    #[test]
    fn test_search_key() {
        assert_eq!(SearchParams::by_id("abcdef0123456789").search_key(), "ABCDEF0123456789");
        assert_eq!(SearchParams::by_amount("99.50").search_key(), "amount_99.50");
        assert_eq!(
            SearchParams::default()
                .with_dates(Some("2024-01-01"), None)
                .search_key(),
            "2024-01-01_to_any"
        );
        assert_eq!(
            SearchParams::default()
                .with_dates(None, Some("2024-02-01"))
                .search_key(),
            "any_to_2024-02-01"
        );
        assert_eq!(SearchParams::default().search_key(), "");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(TransactionStatus::from_action_code("A"), TransactionStatus::Approved);
        assert_eq!(TransactionStatus::from_action_code("r"), TransactionStatus::Rejected);
        assert_eq!(TransactionStatus::from_action_code("P"), TransactionStatus::Pending);
        assert_eq!(TransactionStatus::from_action_code("X"), TransactionStatus::Pending);
        assert_eq!(TransactionStatus::from_action_code(""), TransactionStatus::Pending);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,250.75"), 1250.75);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("n/a"), 0.0);
        assert_eq!(parse_amount("inf"), 0.0);
    }

    #[test]
    fn test_summary_fallbacks() {
        let summary = TransactionSummary::build("KEY1", &[], now());
        assert_eq!(summary.id, "KEY1");
        assert_eq!(summary.status, TransactionStatus::Pending);
        assert_eq!(summary.amount, 0.0);
        assert_eq!(summary.currency, "USD");
        assert_eq!(summary.reference, "KEY1");
        assert_eq!(summary.source, "Unknown");
        assert_eq!(summary.counterparty_country, "US");
        assert_eq!(summary.date, "2024-03-01T12:00:00.000Z");
        assert!(summary.score.is_none());
        assert_eq!(summary.metadata.len(), 8);
        assert_eq!(summary.metadata["destination"], "");
    }

    #[test]
    fn test_summary_from_first_hit() {
        let first = RawTransaction {
            rrr_action_code: "A".into(),
            tpp_curr_code: "EUR".into(),
            tpp_tran_amt: "2,000".into(),
            tbt_ref_num: "REF-9".into(),
            smh_source: "ONLINE".into(),
            smh_dest: "FED".into(),
            tpp_bank_cntry_code: "DE".into(),
            rrr_score: "87".into(),
            rec_crt_ts: "2024-02-10T08:15:30Z".into(),
            ..Default::default()
        };
        let second = RawTransaction {
            rrr_action_code: "R".into(),
            ..Default::default()
        };

        let summary = TransactionSummary::build("KEY", &[hit(first), hit(second)], now());
        assert_eq!(summary.status, TransactionStatus::Approved);
        assert_eq!(summary.currency, "EUR");
        assert_eq!(summary.amount, 2000.0);
        assert_eq!(summary.reference, "REF-9");
        assert_eq!(summary.source, "ONLINE");
        assert_eq!(summary.counterparty_country, "DE");
        assert_eq!(summary.score, Some(87));
        assert_eq!(summary.date, "2024-02-10T08:15:30.000Z");
        assert_eq!(summary.metadata["destination"], "FED");
    }

    #[test]
    fn test_transaction_date_fallback_order() {
        let alt = RawTransaction {
            rqo_tran_date_alt: "2024-01-05 00:00:00".into(),
            rqo_tran_time_alt: "09:30:00".into(),
            rqo_tran_date: "2023-12-31".into(),
            rqo_tran_time: "23:59:59".into(),
            ..Default::default()
        };
        assert_eq!(
            transaction_date(&alt, now()),
            Utc.with_ymd_and_hms(2024, 1, 5, 9, 30, 0).unwrap()
        );

        let primary = RawTransaction {
            rec_crt_ts: "not a date".into(),
            rqo_tran_date: "2023-12-31".into(),
            rqo_tran_time: "23:59:59".into(),
            ..Default::default()
        };
        assert_eq!(
            transaction_date(&primary, now()),
            Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap()
        );

        assert_eq!(transaction_date(&RawTransaction::default(), now()), now());
    }

    #[test]
    fn test_space_separated_timestamp() {
        let raw = RawTransaction {
            rec_crt_ts: "2024-02-10 08:15:30.250".into(),
            ..Default::default()
        };
        assert_eq!(
            transaction_date(&raw, now()).to_rfc3339_opts(SecondsFormat::Millis, true),
            "2024-02-10T08:15:30.250Z"
        );
    }

    #[test]
    fn test_score_leading_digits() {
        assert_eq!(parse_leading_int("85"), Some(85));
        assert_eq!(parse_leading_int("85.9"), Some(85));
        assert_eq!(parse_leading_int("-3x"), Some(-3));
        assert_eq!(parse_leading_int("x"), None);
        assert_eq!(parse_leading_int(""), None);
    }

    #[test]
    fn test_matched_systems() {
        let mut other = hit(RawTransaction::default());
        other.ait_number = "20001".into();
        let mut blank = hit(RawTransaction::default());
        blank.ait_number.clear();

        let result = SearchResult::new(
            "KEY".into(),
            vec![hit(RawTransaction::default()), other, blank],
            now(),
        );
        let matched: Vec<String> = result.matched_systems().into_iter().collect();
        assert_eq!(matched, vec!["11554", "20001"]);
    }

    #[test]
    fn test_adapter_errors_map_to_failures() {
        assert_eq!(
            SearchFailure::from(AdapterError::InvalidRequest("400".into())),
            SearchFailure::InvalidId
        );
        assert_eq!(
            SearchFailure::from(AdapterError::NotFound("404".into())),
            SearchFailure::NotFound
        );
        assert!(matches!(
            SearchFailure::from(AdapterError::Timeout),
            SearchFailure::Backend(_)
        ));
    }
}
