//! Transaction search results from the log-search backend.

/// One log-search hit for a transaction, tagged with the system that logged it.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TransactionDetail {
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "crate::nullable::string"))]
    pub source: String,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "crate::nullable::string"))]
    pub source_type: String,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "crate::nullable::string"))]
    pub ait_number: String,
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "crate::nullable::string"))]
    pub ait_name: String,
    #[cfg_attr(feature = "serde", serde(rename = "_raw", default))]
    pub raw: RawTransaction,
}

/// The raw wire-transfer log columns.
///
/// Column names are the backend's upper-case mnemonics. Every column is
/// optional on the wire and defaults to the empty string.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE", default))]
pub struct RawTransaction {
    pub wtx_gfd_id: String,
    pub smh_source: String,
    pub smh_dest: String,
    pub rqo_tran_date: String,
    pub rqo_tran_time: String,
    pub rqo_tran_date_alt: String,
    pub rqo_tran_time_alt: String,
    pub xqo_cust_cntry_code: String,
    pub aqq_cust_a_num: String,
    pub aqq_billing_curr_code: String,
    pub tbt_tran_type: String,
    pub tbt_ref_num: String,
    pub tbt_billing_amt: String,
    pub tbt_mod_amt: String,
    pub tbt_sch_ref_num: String,
    pub tpp_cntry_code: String,
    pub tpp_bank_cntry_code: String,
    pub tpp_cust_a_num: String,
    pub tpp_curr_code: String,
    pub tpp_tran_amt: String,
    pub dba_entry_method: String,
    pub dba_approval_type_req: String,
    /// Transaction id as carried in the 20-byte string column.
    pub rua_20byte_string_001: String,
    pub rrr_action_code: String,
    pub rrr_score: String,
    /// Transaction id as carried in the correlation column.
    pub bcc_cps_correlation: String,
    pub rec_crt_ts: String,
    pub dba_approved_by_userid2: String,
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn deserializes_upper_case_columns() {
        let json = r#"{
            "source": "wires",
            "sourceType": "mq",
            "aitNumber": "11554",
            "aitName": "Wire Gateway",
            "_raw": {
                "WTX_GFD_ID": "GFD1",
                "RUA_20BYTE_STRING_001": "ABCDEF0123456789",
                "TBT_BILLING_AMT": "1,250.00",
                "DBA_APPROVED_BY_USERID2": "ops1"
            }
        }"#;

        let detail: TransactionDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.source_type, "mq");
        assert_eq!(detail.ait_number, "11554");
        assert_eq!(detail.raw.wtx_gfd_id, "GFD1");
        assert_eq!(detail.raw.rua_20byte_string_001, "ABCDEF0123456789");
        assert_eq!(detail.raw.tbt_billing_amt, "1,250.00");
        assert_eq!(detail.raw.dba_approved_by_userid2, "ops1");
        assert!(detail.raw.rrr_action_code.is_empty());
    }
}
