use crate::config::{Settings, SCRIPT_KEY_VAR};
use crate::domains::farm_client::SpoolTarget;
use crate::domains::tracking_client::TrackingClient;
use crate::services::assembler::JobAssembler;
use crate::services::publisher::Publisher;
use crate::services::session::{FarmSubmit, OutputSession};
use crate::services::shotgrid::{OfflineTracking, ShotgridClient};
use crate::services::tractor::TractorClient;
use anyhow::{anyhow, Context};
use clap::{Args as ClapArgs, Parser, Subcommand};
use katana::host::{SelectionEvents, StaticHost};
use katana::models::outputs::RenderOutputs;
use katana::models::render_target::{NodeInfo, RENDER_KIND};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "katana-output")]
#[command(version)]
#[command(about = "Render Katana nodes in a local terminal or spool them to the farm, one task per frame.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open a terminal rendering the whole range for each node
    Render(SelectionArgs),
    /// Spool one farm job per node
    Submit(SubmitArgs),
    /// Print the effective settings as json
    Settings,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SelectionArgs {
    /// Katana scene to render
    #[arg(long)]
    pub scene: PathBuf,

    /// Selected node, as `name` or `name:NodeType`. Only Render nodes are kept.
    #[arg(long = "node", required = true)]
    pub nodes: Vec<String>,

    /// First frame, the working range start when omitted
    #[arg(long)]
    pub start: Option<String>,

    /// Last frame, the working range end when omitted
    #[arg(long)]
    pub end: Option<String>,
}

impl SelectionArgs {
    /// Overwrite the session's frame fields with whatever was given on the command line.
    fn apply_frames(&self, session: &mut OutputSession) {
        if let Some(start) = &self.start {
            session.set_start_frame(start);
        }
        if let Some(end) = &self.end {
            session.set_end_frame(end);
        }
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Declared render output, as `node:output=path`
    #[arg(long = "output")]
    pub outputs: Vec<String>,

    /// Register the primary output of beauty nodes with the tracking system
    #[arg(long)]
    pub publish: bool,

    /// Display name used in the job title when no tracking site is configured
    #[arg(long)]
    pub user_name: Option<String>,

    /// Project name used in the job title when no tracking site is configured
    #[arg(long)]
    pub project: Option<String>,

    /// Print the jobs as json instead of spooling them
    #[arg(long)]
    pub dry_run: bool,
}

/// `render_bty` or `render_bty:Render`
pub fn parse_node(value: &str) -> NodeInfo {
    match value.split_once(':') {
        Some((name, kind)) => NodeInfo::new(name, kind),
        None => NodeInfo::new(value, RENDER_KIND),
    }
}

/// `render_bty:primary=/out/bty.####.exr`
pub fn parse_output(value: &str) -> anyhow::Result<(String, String, PathBuf)> {
    let (target, path) = value
        .split_once('=')
        .ok_or_else(|| anyhow!("Output {value:?} is missing '=<path>'"))?;
    let (node, name) = target
        .split_once(':')
        .ok_or_else(|| anyhow!("Output {value:?} is missing '<node>:<name>'"))?;
    Ok((node.to_owned(), name.to_owned(), PathBuf::from(path)))
}

fn build_host(selection: &SelectionArgs, outputs: &[String]) -> anyhow::Result<StaticHost> {
    let mut declared: HashMap<String, RenderOutputs> = HashMap::new();
    for value in outputs {
        let (node, name, path) = parse_output(value)?;
        declared.entry(node).or_default().insert(name, path);
    }

    let nodes = selection
        .nodes
        .iter()
        .map(|value| {
            let node = parse_node(value);
            match declared.get(&node.name) {
                Some(outputs) => node.with_outputs(outputs.clone()),
                None => node,
            }
        })
        .collect();

    // a fresh katana scene's working range
    Ok(StaticHost {
        nodes,
        range: (1, 1),
        scene: selection.scene.clone(),
    })
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// OS account name owning the farm jobs.
pub fn account_name() -> anyhow::Result<String> {
    env_var("USER")
        .or_else(|| env_var("USERNAME"))
        .context("Neither USER nor USERNAME is set, cannot tell who owns the job")
}

fn tracking_client(
    settings: &Settings,
    args: &SubmitArgs,
    account: &str,
) -> anyhow::Result<Box<dyn TrackingClient>> {
    let tracking = &settings.tracking;
    let configured = (
        tracking.site.as_deref(),
        tracking.script_name.as_deref(),
        tracking.project_id,
        env_var(SCRIPT_KEY_VAR),
    );

    match configured {
        (Some(site), Some(script), Some(project_id), Some(key)) => {
            let login = tracking.login.clone().unwrap_or_else(|| account.to_owned());
            info!(site, project_id, "Using tracking site");
            Ok(Box::new(ShotgridClient::new(site, script, key, project_id, login)?))
        }
        _ => {
            let user = args.user_name.clone().unwrap_or_else(|| account.to_owned());
            let project = args.project.clone().unwrap_or_default();
            Ok(Box::new(OfflineTracking::new(user, project)))
        }
    }
}

impl Cli {
    pub fn run(self, settings: Settings) -> anyhow::Result<()> {
        let selector = env_var(&settings.toolchains.selector_var);
        let toolchain = settings.toolchains.resolve(selector.as_deref());
        let assembler = JobAssembler::new(toolchain);
        let mut events = SelectionEvents::new();

        match self.command {
            Commands::Settings => {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            }
            Commands::Render(selection) => {
                let host = build_host(&selection, &[])?;
                let mut session = OutputSession::open(&host, &mut events);
                selection.apply_frames(&mut session);

                let handles =
                    session.render_local(&host, &mut events, &assembler, &settings.launcher)?;
                info!(count = handles.len(), "Local renders launched");
            }
            Commands::Submit(args) => {
                let host = build_host(&args.selection, &args.outputs)?;
                let account = account_name()?;
                let tracking = tracking_client(&settings, &args, &account)?;

                let mut session = OutputSession::open(&host, &mut events);
                args.selection.apply_frames(&mut session);
                session.set_publish(args.publish);

                if args.dry_run {
                    let range = session.frame_range()?;
                    let context = tracking.context()?;
                    let (_, jobs) =
                        assembler.assemble(&context, &host.scene, &session.targets(), range)?;
                    session.close(&mut events);
                    println!("{}", serde_json::to_string_pretty(&jobs)?);
                    return Ok(());
                }

                let spool_host = env_var("HOSTNAME").unwrap_or_else(|| "localhost".to_owned());
                let farm = TractorClient::new(spool_host);
                let spool = SpoolTarget {
                    host: settings.farm.host.clone(),
                    port: settings.farm.port,
                    owner: account,
                };
                let publisher = Publisher::new(settings.publish.clone());
                let submit = FarmSubmit {
                    farm: &farm,
                    spool: &spool,
                    tracking: tracking.as_ref(),
                    publisher: &publisher,
                };

                let report = session.submit_to_farm(&host, &mut events, &assembler, &submit)?;
                for handle in &report.submissions {
                    match handle.jid {
                        Some(jid) => println!("{jid} {}", handle.title),
                        None => println!("{}", handle.title),
                    }
                }
                info!(
                    jobs = report.submissions.len(),
                    publishes = report.publishes.len(),
                    "Submission finished"
                );
            }
        }
        Ok(())
    }
}
