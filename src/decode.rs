//! Positional record decoder
//!
//! The firmware encodes each channel table as one pipe-delimited string: a
//! leading row count followed by fixed-width groups of fields, one group per
//! channel.
//!
//! ```text
//! |2|1|Locked|QAM256|1|579000000 Hz|5.1|40.4|0|0|2|Locked|QAM256|2|585000000 Hz|4.8|40.1|0|0|
//!  ^ ^------------------ group 0 ---------------^ ^------------------ group 1 ---------------^
//!  count
//! ```
//!
//! A group that would run past the end of the field list stops decoding
//! without error; the records decoded so far are returned. A field that does
//! not parse fails the whole table.

use crate::error::DecodeError;
use crate::model::{DeviceIdentity, DownstreamChannel, UpstreamChannel, VENDOR};
use tracing::debug;

/// Fields per downstream group
pub const DOWNSTREAM_GROUP_WIDTH: usize = 9;

/// Fields per upstream group
pub const UPSTREAM_GROUP_WIDTH: usize = 7;

const HZ_SUFFIX: &str = " Hz";

/// A record decoded from one fixed-width group of fields
pub trait GroupRecord: Sized {
    /// Number of fields in one group
    const GROUP_WIDTH: usize;

    /// Decode `fields` (exactly `GROUP_WIDTH` long) as group number `group`
    fn from_group(group: usize, fields: &[&str]) -> Result<Self, DecodeError>;
}

impl GroupRecord for DownstreamChannel {
    const GROUP_WIDTH: usize = DOWNSTREAM_GROUP_WIDTH;

    // 0 channel, 1 lock status, 2 modulation, 3 channel id,
    // 4 frequency, 5 power, 6 snr, 7 correctables, 8 uncorrectables
    fn from_group(group: usize, fields: &[&str]) -> Result<Self, DecodeError> {
        Ok(Self {
            channel_id: fields[0].to_string(),
            frequency_hz: parse_frequency(group, fields[4])?,
            power_dbmv: parse_power(group, fields[5])?,
            snr_db: fields[6].parse().map_err(|_| DecodeError::BadSnr {
                group,
                value: fields[6].to_string(),
            })?,
        })
    }
}

impl GroupRecord for UpstreamChannel {
    const GROUP_WIDTH: usize = UPSTREAM_GROUP_WIDTH;

    // 0 channel, 1 lock status, 2 channel type, 3 channel id,
    // 4 symbol rate, 5 frequency, 6 power
    fn from_group(group: usize, fields: &[&str]) -> Result<Self, DecodeError> {
        Ok(Self {
            channel_id: fields[0].to_string(),
            symbol_rate: fields[4].parse().map_err(|_| DecodeError::BadSymbolRate {
                group,
                value: fields[4].to_string(),
            })?,
            frequency_hz: parse_frequency(group, fields[5])?,
            power_dbmv: parse_power(group, fields[6])?,
        })
    }
}

/// Decode the downstream bonded channel table
pub fn decode_downstream(raw: &str) -> Result<Vec<DownstreamChannel>, DecodeError> {
    decode_table(raw)
}

/// Decode the upstream bonded channel table
pub fn decode_upstream(raw: &str) -> Result<Vec<UpstreamChannel>, DecodeError> {
    decode_table(raw)
}

/// Decode a count-prefixed table of `T` groups
pub fn decode_table<T: GroupRecord>(raw: &str) -> Result<Vec<T>, DecodeError> {
    let fields = split_fields(raw);

    let count_field = fields.first().copied().unwrap_or_default();
    let count: usize = count_field.parse().map_err(|_| DecodeError::BadCount {
        value: count_field.to_string(),
    })?;

    let mut records = Vec::new();
    for group in 0..count {
        let start = group * T::GROUP_WIDTH + 1;
        let end = start + T::GROUP_WIDTH;
        if end > fields.len() {
            debug!(
                "Table announces {} groups, only {} complete",
                count,
                records.len()
            );
            break;
        }
        records.push(T::from_group(group, &fields[start..end])?);
    }

    Ok(records)
}

/// Split on `|` and drop empty fields
fn split_fields(raw: &str) -> Vec<&str> {
    raw.split('|').filter(|field| !field.is_empty()).collect()
}

fn parse_frequency(group: usize, field: &str) -> Result<u64, DecodeError> {
    field
        .strip_suffix(HZ_SUFFIX)
        .unwrap_or(field)
        .parse()
        .map_err(|_| DecodeError::BadFrequency {
            group,
            value: field.to_string(),
        })
}

fn parse_power(group: usize, field: &str) -> Result<f64, DecodeError> {
    field.parse().map_err(|_| DecodeError::BadPower {
        group,
        value: field.to_string(),
    })
}

/// Decode the status page identity record.
///
/// Fields are positional and empty fields are kept:
/// 0 hardware version, 1 firmware version, 2 serial number,
/// 4 MAC address, 6 CM IPv4 address.
pub fn decode_identity(raw: &str, model: &str) -> Result<DeviceIdentity, DecodeError> {
    let fields: Vec<&str> = raw.split('|').collect();
    let field = |index: usize, name: &'static str| {
        fields
            .get(index)
            .map(|value| value.to_string())
            .ok_or(DecodeError::MissingIdentityField { field: name, index })
    };

    Ok(DeviceIdentity {
        vendor: VENDOR.to_string(),
        model: model.to_string(),
        hardware_version: field(0, "hardware_version")?,
        firmware_version: field(1, "firmware_version")?,
        serial_number: field(2, "serial_number")?,
        mac_address: field(4, "mac_address")?,
        ip_address: field(6, "cm_ipv4_address")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DOWNSTREAM: &str = "2|1|Locked|QAM256|1|579000000 Hz|5.1|40.4|12|0|\
                              2|Locked|QAM256|2|585000000 Hz|-4.8|40.1|3|1|";

    const UPSTREAM: &str = "|2|1|Locked|ATDMA|3|5120|16400000 Hz|44.3|\
                            2|Locked|ATDMA|4|2560|22800000 Hz|45|";

    #[test]
    fn test_decode_downstream() {
        let channels = decode_downstream(DOWNSTREAM).unwrap();
        assert_eq!(channels.len(), 2);

        assert_eq!(channels[0].channel_id, "1");
        assert_eq!(channels[0].frequency_hz, 579_000_000);
        assert_relative_eq!(channels[0].power_dbmv, 5.1);
        assert_relative_eq!(channels[0].snr_db, 40.4);

        assert_eq!(channels[1].channel_id, "2");
        assert_eq!(channels[1].frequency_hz, 585_000_000);
        assert_relative_eq!(channels[1].power_dbmv, -4.8);
    }

    #[test]
    fn test_decode_upstream() {
        let channels = decode_upstream(UPSTREAM).unwrap();
        assert_eq!(channels.len(), 2);

        assert_eq!(channels[0].channel_id, "1");
        assert_eq!(channels[0].symbol_rate, 5120);
        assert_eq!(channels[0].frequency_hz, 16_400_000);
        assert_relative_eq!(channels[0].power_dbmv, 44.3);

        assert_eq!(channels[1].symbol_rate, 2560);
        assert_relative_eq!(channels[1].power_dbmv, 45.0);
    }

    #[test]
    fn test_frequency_suffix_stripped() {
        assert_eq!(parse_frequency(0, "600000000 Hz"), Ok(600_000_000));
        assert_eq!(parse_frequency(0, "600000000"), Ok(600_000_000));
    }

    #[test]
    fn test_zero_count() {
        assert!(decode_downstream("|0|").unwrap().is_empty());
        assert!(decode_upstream("0").unwrap().is_empty());
    }

    #[test]
    fn test_truncated_last_group_is_dropped() {
        // second group lacks its final field
        let raw = "2|1|Locked|QAM256|1|579000000 Hz|5.1|40.4|12|0|\
                   2|Locked|QAM256|2|585000000 Hz|4.8|40.1|3|";
        let channels = decode_downstream(raw).unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].channel_id, "1");
    }

    #[test]
    fn test_count_larger_than_groups() {
        let raw = "32|1|Locked|ATDMA|3|5120|16400000 Hz|44.3|";
        let channels = decode_upstream(raw).unwrap();
        assert_eq!(channels.len(), 1);
    }

    #[test]
    fn test_extra_fields_beyond_count_ignored() {
        let raw = "1|1|Locked|ATDMA|3|5120|16400000 Hz|44.3|2|Locked|ATDMA|4|2560|22800000 Hz|45|";
        assert_eq!(decode_upstream(raw).unwrap().len(), 1);
    }

    #[test]
    fn test_bad_count() {
        assert_eq!(
            decode_downstream("two|1|2|3"),
            Err(DecodeError::BadCount {
                value: "two".to_string()
            })
        );
        assert_eq!(
            decode_downstream("-1|"),
            Err(DecodeError::BadCount {
                value: "-1".to_string()
            })
        );
    }

    #[test]
    fn test_empty_input_is_bad_count() {
        assert_eq!(
            decode_upstream("||"),
            Err(DecodeError::BadCount {
                value: String::new()
            })
        );
    }

    #[test]
    fn test_bad_field_fails_whole_table() {
        let raw = "2|1|Locked|QAM256|1|579000000 Hz|5.1|40.4|12|0|\
                   2|Locked|QAM256|2|585 MHz|4.8|40.1|3|1|";
        assert_eq!(
            decode_downstream(raw),
            Err(DecodeError::BadFrequency {
                group: 1,
                value: "585 MHz".to_string()
            })
        );
    }

    #[test]
    fn test_bad_power_and_snr() {
        let bad_power = "1|1|Locked|QAM256|1|579000000 Hz|n/a|40.4|12|0|";
        assert!(matches!(
            decode_downstream(bad_power),
            Err(DecodeError::BadPower { group: 0, .. })
        ));

        let bad_snr = "1|1|Locked|QAM256|1|579000000 Hz|5.1|--|12|0|";
        assert!(matches!(
            decode_downstream(bad_snr),
            Err(DecodeError::BadSnr { group: 0, .. })
        ));
    }

    #[test]
    fn test_bad_symbol_rate() {
        let raw = "1|1|Locked|ATDMA|3|5120 Ksym/sec|16400000 Hz|44.3|";
        assert_eq!(
            decode_upstream(raw),
            Err(DecodeError::BadSymbolRate {
                group: 0,
                value: "5120 Ksym/sec".to_string()
            })
        );
    }

    #[test]
    fn test_decode_identity() {
        let raw = "1.01|V7.01.01.33|6LB1234567890||A0:04:60:12:34:56|1|10.20.30.40|extra";
        let identity = decode_identity(raw, "CM1000").unwrap();

        assert_eq!(identity.vendor, "NETGEAR");
        assert_eq!(identity.model, "CM1000");
        assert_eq!(identity.hardware_version, "1.01");
        assert_eq!(identity.firmware_version, "V7.01.01.33");
        assert_eq!(identity.serial_number, "6LB1234567890");
        assert_eq!(identity.mac_address, "A0:04:60:12:34:56");
        assert_eq!(identity.ip_address, "10.20.30.40");
    }

    #[test]
    fn test_decode_identity_too_short() {
        assert_eq!(
            decode_identity("1.01|V7|SN|x|MAC", "CM1000"),
            Err(DecodeError::MissingIdentityField {
                field: "cm_ipv4_address",
                index: 6
            })
        );
    }
}
