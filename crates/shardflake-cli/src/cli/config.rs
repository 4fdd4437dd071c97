use anyhow::bail;
use clap::{Parser, Subcommand};
use core::time::Duration;
use shardflake::{FixedNodeId, PartitionStrategy, SnowflakeId, TimeUnit};
use std::time::{SystemTime, UNIX_EPOCH};

/// Runtime configuration for the `shardflake` binary.
///
/// Global settings are read from CLI arguments or environment variables (a
/// `.env` file in the working directory is loaded first). They must match the
/// settings of the services that generate and store IDs, otherwise decoded
/// timestamps and table names will disagree with theirs.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "shardflake",
    version,
    about = "Generate and decode Snowflake IDs and name partitioned tables"
)]
pub struct CliArgs {
    /// Node ID embedded in generated IDs (0..=31).
    ///
    /// When unset, the node ID is derived from the last two octets of the
    /// host's IPv4 address.
    ///
    /// Environment variable: `NODE_ID`
    #[arg(long, env = "NODE_ID")]
    pub node_id: Option<i64>,

    /// Epoch that ID timestamps count from, in Unix milliseconds.
    ///
    /// Environment variable: `EPOCH_MS`
    #[arg(long, env = "EPOCH_MS", default_value_t = 0)]
    pub epoch_ms: u64,

    /// Log filter used when `RUST_LOG` is not set. Logs go to stderr.
    ///
    /// Environment variable: `LOG_LEVEL`
    #[arg(long, env = "LOG_LEVEL", default_value_t = String::from("warn"))]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print freshly generated IDs, one per line.
    Generate {
        /// Number of IDs to generate.
        #[arg(short, long, default_value_t = 1)]
        count: usize,
    },
    /// Print the creation time, node ID and sequence of each ID.
    Decode {
        #[arg(required = true, allow_negative_numbers = true)]
        ids: Vec<i64>,
    },
    /// Print the table a row with the given key is stored in.
    Table {
        /// Partition key: a Snowflake ID for time-based partitioning, any
        /// integer or text for quantity-based partitioning.
        key: String,

        /// Logical table name.
        #[arg(long)]
        base: String,

        /// `none`, `time-based` or `quantity-based`.
        #[arg(long, default_value_t = PartitionStrategy::TimeBased)]
        strategy: PartitionStrategy,

        /// `daily`, `weekly` or `monthly`, for time-based partitioning.
        #[arg(long, default_value_t = TimeUnit::Monthly)]
        unit: TimeUnit,

        /// strftime pattern replacing the unit's suffix; `{base}` is the
        /// logical table name.
        #[arg(long)]
        format: Option<String>,

        /// Number of tables, for quantity-based partitioning.
        #[arg(long, default_value_t = 0)]
        table_count: u32,

        /// Hash the key as text even if it parses as an integer.
        #[arg(long, default_value_t = false)]
        text: bool,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub node_id: Option<FixedNodeId>,
    pub epoch: Duration,
    pub log_level: String,
    pub command: Command,
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let node_id = match args.node_id {
            Some(raw) => match FixedNodeId::new(raw) {
                Some(node_id) => Some(node_id),
                None => bail!(
                    "NODE_ID ({}) is outside the Snowflake node ID space (0..={})",
                    raw,
                    SnowflakeId::MAX_NODE_ID
                ),
            },
            None => None,
        };

        let epoch = Duration::from_millis(args.epoch_ms);
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?;
        if epoch > now {
            bail!("EPOCH_MS ({}) is in the future", args.epoch_ms);
        }

        if let Command::Table {
            strategy: PartitionStrategy::QuantityBased,
            table_count: 0,
            ..
        } = args.command
        {
            bail!("--table-count must be greater than 0 for quantity-based partitioning");
        }

        Ok(Self {
            node_id,
            epoch,
            log_level: args.log_level,
            command: args.command,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> anyhow::Result<Config> {
        let args = CliArgs::try_parse_from(std::iter::once("shardflake").chain(args.iter().copied()))?;
        Config::try_from(args)
    }

    #[test]
    fn defaults() {
        let config = config(&["--node-id", "3", "generate"]).unwrap();
        assert_eq!(config.node_id, FixedNodeId::new(3));
        assert_eq!(config.epoch, Duration::ZERO);
        assert_eq!(config.command, Command::Generate { count: 1 });
    }

    #[test]
    fn rejects_out_of_range_node_id() {
        let err = config(&["--node-id", "32", "generate"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "NODE_ID (32) is outside the Snowflake node ID space (0..=31)"
        );
        assert!(config(&["--node-id=-1", "generate"]).is_err());
    }

    #[test]
    fn rejects_future_epoch() {
        let err = config(&["--epoch-ms", "99999999999999", "generate"]).unwrap_err();
        assert_eq!(err.to_string(), "EPOCH_MS (99999999999999) is in the future");
    }

    #[test]
    fn rejects_empty_quantity_partitioning() {
        let err = config(&[
            "table",
            "42",
            "--base",
            "Orders",
            "--strategy",
            "quantity-based",
        ])
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "--table-count must be greater than 0 for quantity-based partitioning"
        );
    }

    #[test]
    fn parses_table_options() {
        let config = config(&[
            "--node-id",
            "0",
            "table",
            "ada@example.com",
            "--base",
            "Customers",
            "--strategy",
            "quantity",
            "--table-count",
            "8",
            "--text",
        ])
        .unwrap();
        assert_eq!(
            config.command,
            Command::Table {
                key: "ada@example.com".into(),
                base: "Customers".into(),
                strategy: PartitionStrategy::QuantityBased,
                unit: TimeUnit::Monthly,
                format: None,
                table_count: 8,
                text: true,
            }
        );
    }

    #[test]
    fn decode_requires_ids() {
        assert!(config(&["decode"]).is_err());
        let config = config(&["--node-id", "0", "decode", "1", "-5"]).unwrap();
        assert_eq!(config.command, Command::Decode { ids: vec![1, -5] });
    }
}
