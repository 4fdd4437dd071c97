use std::{borrow::Cow, fmt, str::FromStr};

/// How an entity type is split across physical tables.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PartitionStrategy {
    /// No strategy. Rejected when partitioning is enabled.
    #[default]
    None,
    /// One table per day/week/month, derived from the timestamp embedded in
    /// the entity's generated ID.
    TimeBased,
    /// A fixed number of tables, selected by hashing the key.
    QuantityBased,
}

/// Table granularity for [`PartitionStrategy::TimeBased`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    /// No unit; time-based lookups fall back to the base table.
    #[default]
    None,
    /// `{base}_yyyyMMdd`
    Daily,
    /// `{base}_{iso year}_W{iso week}`
    ///
    /// The year is the ISO week-numbering year, not the calendar year, so
    /// days near New Year can land in a table named for the adjacent year:
    /// 2024-12-30 is `_2025_W1` and 2021-01-01 is `_2020_W53`.
    Weekly,
    /// `{base}_yyyyMM`
    Monthly,
}

/// Partitioning declaration of an entity type.
///
/// Fields not relevant to the chosen strategy are ignored: `time_unit` and
/// `table_name_format` only apply to [`PartitionStrategy::TimeBased`],
/// `table_count` only to [`PartitionStrategy::QuantityBased`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PartitioningConfig {
    /// When `false`, every lookup returns the base table name.
    pub enabled: bool,
    /// How rows are split when `enabled` is set.
    pub strategy: PartitionStrategy,
    /// Table granularity for [`PartitionStrategy::TimeBased`].
    pub time_unit: TimeUnit,
    /// Replaces the time unit's default suffix. A strftime pattern applied
    /// to the decoded creation time, where `{base}` stands for the base
    /// table name, e.g. `"{base}_%Y_%m"`.
    pub table_name_format: Option<Cow<'static, str>>,
    /// Number of tables for [`PartitionStrategy::QuantityBased`]. Must be
    /// non-zero for that strategy.
    pub table_count: u32,
    /// Reads the key from this field instead of the type's key field.
    pub key_field: Option<Cow<'static, str>>,
}

impl PartitioningConfig {
    /// Partitioning switched off.
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            strategy: PartitionStrategy::None,
            time_unit: TimeUnit::None,
            table_name_format: None,
            table_count: 0,
            key_field: None,
        }
    }

    /// One table per `unit`, keyed by the generated ID's timestamp.
    pub const fn time_based(unit: TimeUnit) -> Self {
        Self {
            enabled: true,
            strategy: PartitionStrategy::TimeBased,
            time_unit: unit,
            table_name_format: None,
            table_count: 0,
            key_field: None,
        }
    }

    /// `table_count` tables, selected by hashing the key.
    pub const fn quantity_based(table_count: u32) -> Self {
        Self {
            enabled: true,
            strategy: PartitionStrategy::QuantityBased,
            time_unit: TimeUnit::None,
            table_name_format: None,
            table_count,
            key_field: None,
        }
    }

    #[must_use]
    /// Sets [`table_name_format`](Self::table_name_format).
    pub fn with_table_name_format(mut self, format: impl Into<Cow<'static, str>>) -> Self {
        self.table_name_format = Some(format.into());
        self
    }

    #[must_use]
    /// Sets [`key_field`](Self::key_field).
    pub fn with_key_field(mut self, field: impl Into<Cow<'static, str>>) -> Self {
        self.key_field = Some(field.into());
        self
    }
}

/// Error returned when parsing a [`PartitionStrategy`] or [`TimeUnit`] from
/// text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {kind} `{value}`")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl FromStr for PartitionStrategy {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "none" => Ok(Self::None),
            "time_based" | "time" => Ok(Self::TimeBased),
            "quantity_based" | "quantity" => Ok(Self::QuantityBased),
            _ => Err(ParseEnumError {
                kind: "partition strategy",
                value: s.to_owned(),
            }),
        }
    }
}

impl FromStr for TimeUnit {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "daily" | "day" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            _ => Err(ParseEnumError {
                kind: "time unit",
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for PartitionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::TimeBased => "time_based",
            Self::QuantityBased => "quantity_based",
        })
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_strategies_and_units() {
        assert_eq!("time-based".parse::<PartitionStrategy>(), Ok(PartitionStrategy::TimeBased));
        assert_eq!("QUANTITY_BASED".parse::<PartitionStrategy>(), Ok(PartitionStrategy::QuantityBased));
        assert_eq!("none".parse::<PartitionStrategy>(), Ok(PartitionStrategy::None));
        assert_eq!("Weekly".parse::<TimeUnit>(), Ok(TimeUnit::Weekly));
        assert_eq!(
            "hourly".parse::<TimeUnit>().unwrap_err().to_string(),
            "unrecognized time unit `hourly`"
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        for strategy in [
            PartitionStrategy::None,
            PartitionStrategy::TimeBased,
            PartitionStrategy::QuantityBased,
        ] {
            assert_eq!(strategy.to_string().parse::<PartitionStrategy>(), Ok(strategy));
        }
    }

    #[test]
    fn builders_set_optional_fields() {
        let config = PartitioningConfig::quantity_based(4).with_key_field("region");
        assert!(config.enabled);
        assert_eq!(config.key_field.as_deref(), Some("region"));

        let config = PartitioningConfig::time_based(TimeUnit::Daily)
            .with_table_name_format(String::from("{base}_%Y"));
        assert_eq!(config.table_name_format.as_deref(), Some("{base}_%Y"));
        assert_eq!(PartitioningConfig::default(), PartitioningConfig::disabled());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_with_defaults() {
        let config: PartitioningConfig = serde_json::from_str(
            r#"{"enabled": true, "strategy": "time_based", "time_unit": "weekly"}"#,
        )
        .unwrap();
        assert_eq!(config, PartitioningConfig::time_based(TimeUnit::Weekly));
    }
}
