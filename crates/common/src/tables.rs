//! Table number to table GUID lookup
//!
//! Each physical table in the staging venue has a fixed GUID that the
//! ordering frontend uses as the path segment of its QR-code URL.

use serde::Serialize;

use crate::error::{Error, Result};

/// Table used when a test does not ask for a specific one
pub const DEFAULT_TABLE_NUMBER: u32 = 10;

/// Frontend origin that table URLs are built on
pub const FRONTEND_BASE_URL: &str =
    "https://nextgen-frontend-dev-b0chfba5a6hyb3ga.eastus-01.azurewebsites.net";

/// Known tables, sorted by table number
const TABLE_MAPPING: &[(u32, &str)] = &[
    (1, "7230F695-E841-4283-8611-53C9C0C46FFB"),
    (2, "7A10BDF2-92BD-475C-B506-F9494612F83F"),
    (3, "4F075B94-A58B-48E1-B906-40ACDC26B9AC"),
    (4, "0DC4518B-85FA-4A8E-84FB-0767B6F0EDD9"),
    (5, "1697B1EB-1013-40EF-85E0-625BFED736C2"),
    (6, "69670409-B895-4655-832F-3265CF32E1D9"),
    (7, "F77BB632-2CFB-400C-9F7C-28A4569A3DFB"),
    (8, "B25F66BA-C7B0-43A3-9BFC-A21B97845480"),
    (9, "2A57EDE7-79D7-454E-B171-F5C662531FBD"),
    (10, "38A31859-CA10-452C-BF40-ED361D7F6749"),
    (11, "5CF63A35-1900-4F75-B689-73AC850A08FA"),
    (12, "CD1CC80A-E6D0-4A59-A153-9ABDA682C336"),
    (13, "5904EDF5-C79E-410C-A4CD-644F7A335167"),
    (14, "BD551B32-C097-4CE4-AB62-0D2FECC2C2B0"),
    (15, "853BE38D-46A3-4B42-9F0A-8D7E521D449E"),
    (16, "457CC58B-EAD9-4B89-BE23-B02CB39CFE23"),
    (17, "CA0EF643-B1F6-40CB-9265-973ED58D3DF8"),
    (18, "B4D4AEB6-DB90-49B5-A136-67F659311125"),
    (19, "E264FC25-1A82-4209-8118-CA25A1BBD0BB"),
    (20, "8690275A-3D98-4228-A4D4-3C8A094EF9EC"),
    (21, "F28D7143-84C1-4971-8C31-C5897D91BBBB"),
    (22, "84895675-44A3-4EE4-A453-0D33C64104FF"),
    (23, "B2D3FB51-5573-48E6-8670-E87F093E1F2A"),
    (24, "0DACEE34-E39B-4339-98AC-6981C9DCA247"),
    (25, "F1CA441A-49B9-4DAF-97F0-8389EAF7C2CD"),
];

/// A physical table and its frontend GUID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableIdentity {
    pub table_number: u32,
    pub table_guid: &'static str,
}

impl TableIdentity {
    /// Look up a known table
    pub fn lookup(table_number: u32) -> Result<Self> {
        Ok(Self {
            table_number,
            table_guid: get_table_id(table_number)?,
        })
    }

    /// All known tables in table-number order
    pub fn all() -> impl Iterator<Item = TableIdentity> {
        TABLE_MAPPING.iter().map(|&(table_number, table_guid)| TableIdentity {
            table_number,
            table_guid,
        })
    }

    /// Frontend URL for this table on the given origin
    pub fn url_on(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.table_guid)
    }
}

/// Get the table GUID for a table number
pub fn get_table_id(table_number: u32) -> Result<&'static str> {
    TABLE_MAPPING
        .binary_search_by_key(&table_number, |&(number, _)| number)
        .map(|idx| TABLE_MAPPING[idx].1)
        .map_err(|_| Error::UnknownTable {
            table: table_number,
            valid: get_all_table_numbers(),
        })
}

/// Get the frontend URL for a table number
pub fn get_table_url(table_number: u32) -> Result<String> {
    table_url(FRONTEND_BASE_URL, table_number)
}

/// Get the URL for a table number on a specific frontend origin
pub fn table_url(base_url: &str, table_number: u32) -> Result<String> {
    Ok(TableIdentity::lookup(table_number)?.url_on(base_url))
}

/// All known table numbers, sorted
pub fn get_all_table_numbers() -> Vec<u32> {
    TABLE_MAPPING.iter().map(|&(number, _)| number).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_ten_guid_and_url() {
        assert_eq!(
            get_table_id(10).unwrap(),
            "38A31859-CA10-452C-BF40-ED361D7F6749"
        );
        assert_eq!(
            get_table_url(10).unwrap(),
            "https://nextgen-frontend-dev-b0chfba5a6hyb3ga.eastus-01.azurewebsites.net/38A31859-CA10-452C-BF40-ED361D7F6749"
        );
    }

    #[test]
    fn test_lookup_is_stable_for_every_known_table() {
        for number in get_all_table_numbers() {
            let first = get_table_id(number).unwrap();
            let second = get_table_id(number).unwrap();
            assert_eq!(first, second);
            assert_eq!(first.len(), 36);
        }
    }

    #[test]
    fn test_unknown_table_is_rejected() {
        for number in [0, 26, 51, 999] {
            match get_table_id(number) {
                Err(Error::UnknownTable { table, valid }) => {
                    assert_eq!(table, number);
                    assert_eq!(valid.len(), 25);
                }
                other => panic!("expected UnknownTable, got {:?}", other),
            }
        }
        assert!(get_table_url(0).is_err());
    }

    #[test]
    fn test_mapping_is_sorted_for_binary_search() {
        let numbers = get_all_table_numbers();
        let mut sorted = numbers.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(numbers, sorted);
        assert_eq!(numbers.first(), Some(&1));
        assert_eq!(numbers.last(), Some(&25));
    }

    #[test]
    fn test_url_on_custom_origin() {
        let url = table_url("http://localhost:5173/", 1).unwrap();
        assert_eq!(url, "http://localhost:5173/7230F695-E841-4283-8611-53C9C0C46FFB");
    }

    #[test]
    fn test_default_table_is_known() {
        assert!(TableIdentity::lookup(DEFAULT_TABLE_NUMBER).is_ok());
    }
}
