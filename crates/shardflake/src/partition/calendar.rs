use chrono::{
    DateTime, Datelike, Utc,
    format::{Item, StrftimeItems},
};
use core::fmt::Write;

use crate::{
    error::{Error, Result},
    partition::TimeUnit,
};

/// Builds the physical table name for a row created at `at`.
///
/// Returns `base` unchanged when `unit` is [`TimeUnit::None`].
///
/// # Errors
///
/// [`Error::InvalidTableNameFormat`] if `format` is not a valid strftime
/// pattern.
pub fn time_table_name(
    base: &str,
    at: DateTime<Utc>,
    unit: TimeUnit,
    format: Option<&str>,
) -> Result<String> {
    match (unit, format) {
        (TimeUnit::None, _) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(table = base, "time-based partitioning without a time unit; using the base table");
            Ok(base.to_owned())
        }
        (_, Some(format)) => render_template(base, at, format),
        (TimeUnit::Daily, None) => Ok(format!("{base}_{}", at.format("%Y%m%d"))),
        (TimeUnit::Weekly, None) => {
            let week = at.iso_week();
            Ok(format!("{base}_{}_W{}", week.year(), week.week()))
        }
        (TimeUnit::Monthly, None) => Ok(format!("{base}_{}", at.format("%Y%m"))),
    }
}

fn render_template(base: &str, at: DateTime<Utc>, format: &str) -> Result<String> {
    let invalid = || Error::InvalidTableNameFormat {
        entity: base.to_owned(),
        format: format.to_owned(),
    };

    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(invalid());
    }

    let mut rendered = String::with_capacity(format.len() + base.len());
    write!(rendered, "{}", at.format_with_items(items.iter())).map_err(|_| invalid())?;
    Ok(rendered.replace("{base}", base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap()
    }

    #[test]
    fn default_suffixes() {
        let at = utc(2024, 3, 15);
        let name = |unit| time_table_name("Orders", at, unit, None).unwrap();
        assert_eq!(name(TimeUnit::Daily), "Orders_20240315");
        assert_eq!(name(TimeUnit::Weekly), "Orders_2024_W11");
        assert_eq!(name(TimeUnit::Monthly), "Orders_202403");
        assert_eq!(name(TimeUnit::None), "Orders");
    }

    #[test]
    fn weeks_use_iso_numbering() {
        let name = |at| time_table_name("T", at, TimeUnit::Weekly, None).unwrap();
        // Monday 2024-01-01 opens week 1.
        assert_eq!(name(utc(2024, 1, 1)), "T_2024_W1");
        // Sunday 2024-01-07 still belongs to week 1.
        assert_eq!(name(utc(2024, 1, 7)), "T_2024_W1");
        assert_eq!(name(utc(2024, 1, 8)), "T_2024_W2");
        // Monday 2024-12-30 starts week 1 of 2025.
        assert_eq!(name(utc(2024, 12, 30)), "T_2025_W1");
        // Friday 2021-01-01 sits in week 53 of 2020.
        assert_eq!(name(utc(2021, 1, 1)), "T_2020_W53");
    }

    #[test]
    fn template_overrides_unit_suffix() {
        let at = utc(2024, 3, 15);
        let name = time_table_name("Orders", at, TimeUnit::Monthly, Some("{base}_%Y_%m")).unwrap();
        assert_eq!(name, "Orders_2024_03");

        let name = time_table_name("Orders", at, TimeUnit::Daily, Some("archive.{base}%y%j")).unwrap();
        assert_eq!(name, "archive.Orders24075");
    }

    #[test]
    fn template_ignored_without_unit() {
        let at = utc(2024, 3, 15);
        let name = time_table_name("Orders", at, TimeUnit::None, Some("{base}_%Y")).unwrap();
        assert_eq!(name, "Orders");
    }

    #[test]
    fn invalid_template_is_rejected() {
        let err = time_table_name("Orders", utc(2024, 3, 15), TimeUnit::Daily, Some("{base}_%Q"))
            .unwrap_err();
        assert_eq!(
            err,
            Error::InvalidTableNameFormat {
                entity: "Orders".into(),
                format: "{base}_%Q".into(),
            }
        );
    }
}
