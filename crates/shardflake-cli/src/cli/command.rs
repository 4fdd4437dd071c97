use crate::cli::config::{Command, Config};
use shardflake::{
    FieldValue, FixedNodeId, LocalIpNodeId, LockSnowflakeGenerator, NodeIdResolver,
    PartitioningConfig, SnowflakeGenerator, SnowflakeId, SystemClock, TablePartitioner,
};
use std::io::Write;

/// Node ID source chosen by configuration.
#[derive(Debug, Clone, Copy)]
pub enum NodeSource {
    Fixed(FixedNodeId),
    LocalIp(LocalIpNodeId),
}

impl NodeIdResolver for NodeSource {
    fn resolve(&self) -> i64 {
        match self {
            Self::Fixed(node) => node.resolve(),
            Self::LocalIp(node) => node.resolve(),
        }
    }
}

impl From<Option<FixedNodeId>> for NodeSource {
    fn from(node_id: Option<FixedNodeId>) -> Self {
        node_id.map_or(Self::LocalIp(LocalIpNodeId), Self::Fixed)
    }
}

pub type Generator = LockSnowflakeGenerator<SystemClock, NodeSource>;

/// Runs the configured subcommand, writing its output to `out`.
pub fn run(config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    match &config.command {
        Command::Generate { count } => generate(config, *count, out),
        Command::Decode { ids } => decode(config, ids, out),
        Command::Table {
            key,
            base,
            strategy,
            unit,
            format,
            table_count,
            text,
        } => {
            let partitioning = PartitioningConfig {
                enabled: true,
                strategy: *strategy,
                time_unit: *unit,
                table_name_format: format.clone().map(Into::into),
                table_count: *table_count,
                key_field: None,
            };
            table(config, base, key, *text, &partitioning, out)
        }
    }
}

fn generate(config: &Config, count: usize, out: &mut impl Write) -> anyhow::Result<()> {
    let generator = Generator::with_node(
        NodeSource::from(config.node_id),
        SystemClock::with_epoch(config.epoch),
    );
    tracing::debug!(count, "generating ids");
    for _ in 0..count {
        writeln!(out, "{}", generator.next_id()?)?;
    }
    Ok(())
}

fn decode(config: &Config, ids: &[i64], out: &mut impl Write) -> anyhow::Result<()> {
    for &raw in ids {
        let id = SnowflakeId::from_raw(raw);
        writeln!(
            out,
            "{}\t{}\tnode={}\tseq={}",
            id,
            id.decode_timestamp_with_epoch(config.epoch).to_rfc3339(),
            id.node_id(),
            id.sequence()
        )?;
    }
    Ok(())
}

fn table(
    config: &Config,
    base: &str,
    key: &str,
    text: bool,
    partitioning: &PartitioningConfig,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let key = match key.parse::<i64>() {
        Ok(value) if !text => FieldValue::Int(value),
        _ => FieldValue::Text(key),
    };
    let partitioner = TablePartitioner::with_epoch(config.epoch);
    tracing::debug!(base, strategy = %partitioning.strategy, "resolving table name");
    writeln!(out, "{}", partitioner.resolve(base, Some(key), partitioning)?)?;
    Ok(())
}
