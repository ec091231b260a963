use std::path::{Path, PathBuf};

use {
    anyhow::{Context, Result, bail},
    clap::Args,
    sendtick::SendtickApi,
    sendtick_common::Item,
    sendtick_node::{
        ExecuteContext, NODE_NAME, NodeRegistry, NodeType, SendtickNode, StaticContext,
        extract_call,
    },
    serde_json::Value,
};

use crate::print_json;

#[derive(Args)]
pub struct RunArgs {
    /// JSON file holding an array of items (`-` reads stdin).
    #[arg(short, long)]
    pub input: PathBuf,

    /// Batch parameter applied to every item, e.g. `resource=contact`.
    /// Values are parsed as JSON when possible.
    #[arg(short, long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// Record failing items as `{"error": ...}` instead of stopping.
    #[arg(long, default_value_t = false)]
    pub continue_on_fail: bool,

    /// Node name used in logs and errors.
    #[arg(long, default_value = "Sendtick")]
    pub name: String,
}

pub async fn handle_run(args: RunArgs, api: SendtickApi, dry_run: bool) -> Result<()> {
    let ctx = build_context(&args)?;

    if dry_run {
        return print_json(&Value::Array(plan_items(&api, &ctx)));
    }

    let mut registry = NodeRegistry::new();
    registry.register(Box::new(SendtickNode::new(api)));
    let node: &dyn NodeType = registry
        .get(NODE_NAME)
        .context("sendtick node is not registered")?;

    let output = node.execute(&ctx).await?;
    let items: Vec<Value> = output.into_iter().flatten().map(|item| item.json).collect();
    print_json(&Value::Array(items))
}

fn build_context(args: &RunArgs) -> Result<StaticContext> {
    let raw = read_input(&args.input)?;
    let mut ctx = StaticContext::from_json(&raw)
        .with_context(|| format!("invalid input in {}", args.input.display()))?
        .with_name(args.name.clone())
        .with_continue_on_fail(args.continue_on_fail);
    for param in &args.params {
        let (key, value) = parse_param(param)?;
        ctx = ctx.with_parameter(key, value);
    }
    Ok(ctx)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        return std::io::read_to_string(std::io::stdin()).context("failed to read stdin");
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Split `key=value`; the value is JSON if it parses, a plain string otherwise.
fn parse_param(raw: &str) -> Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("invalid parameter `{raw}`, expected KEY=VALUE");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("invalid parameter `{raw}`, key is empty");
    }
    let value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Planned request per item, or `{"error": ...}` where planning fails.
fn plan_items(api: &SendtickApi, ctx: &StaticContext) -> Vec<Value> {
    (0..ctx.input_data().len())
        .map(|index| {
            extract_call(ctx, index)
                .and_then(|call| api.plan(&call))
                .and_then(|spec| serde_json::to_value(&spec).map_err(Into::into))
                .unwrap_or_else(|err| Item::error(err.to_string()).json)
        })
        .collect()
}
