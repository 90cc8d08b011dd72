use crate::domains::farm_client::{FarmClient, FarmError, SpoolTarget, SubmissionHandle};
use crate::models::job::FarmJob;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;
use uuid::Uuid;

static JID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"jid[^0-9]*(\d+)").expect("jid pattern is valid"));

/// Spools jobs to a Tractor engine over http, as an Alfred job script.
#[derive(Debug, Clone, Default)]
pub struct TractorClient {
    /// Host name reported to the engine as the spooling machine.
    spool_host: String,
}

impl TractorClient {
    pub fn new(spool_host: impl Into<String>) -> Self {
        Self {
            spool_host: spool_host.into(),
        }
    }

    pub fn spool_url(&self, target: &SpoolTarget) -> Result<Url, FarmError> {
        let base = format!("http://{}:{}/Tractor/spool", target.host, target.port);
        let mut url = Url::parse(&base).map_err(|e| FarmError::InvalidAddress(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("owner", &target.owner)
            .append_pair("spoolhost", &self.spool_host);
        Ok(url)
    }
}

/// Quote a value as one Alfred (Tcl) word. Braces keep the text verbatim, but a value
/// holding braces or backslashes has to go in double quotes with backslash escapes.
fn quote(value: &str) -> String {
    if !value.contains(['{', '}', '\\']) {
        return format!("{{{value}}}");
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    escaped.push('"');
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '[' | ']' | '$' | '{' | '}') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('"');
    escaped
}

/// Render the job as an Alfred script, tasks in ascending frame order.
pub fn to_alfred_script(job: &FarmJob) -> String {
    let mut script = String::from("##AlfredToDo 3.0\n");
    script.push_str(&format!(
        "Job -title {} -service {} -priority {} -subtasks {{\n",
        quote(&job.title),
        quote(&job.service),
        job.priority
    ));
    for task in job.tasks() {
        let argv = task
            .argv()
            .iter()
            .map(|arg| quote(arg))
            .collect::<Vec<_>>()
            .join(" ");
        script.push_str(&format!(
            "    Task -title {} -cmds {{\n        RemoteCmd {{{}}} -service {}\n    }}\n",
            quote(&task.title),
            argv,
            quote(&job.service)
        ));
    }
    script.push_str("}\n");
    script
}

/// Pull the job id out of the engine's reply, e.g. `{"rc": 0, "msg": "job script accepted, jid: 42"}`.
pub fn parse_jid(response: &str) -> Option<u64> {
    JID.captures(response)?.get(1)?.as_str().parse().ok()
}

impl FarmClient for TractorClient {
    fn spool(&self, job: &FarmJob, target: &SpoolTarget) -> Result<SubmissionHandle, FarmError> {
        let url = self.spool_url(target)?;
        let script = to_alfred_script(job);

        let mut response = ureq::post(url.as_str())
            .header("Content-Type", "application/tractor-spool")
            .send(script.as_str())
            .map_err(|e| match e {
                ureq::Error::StatusCode(code) => {
                    FarmError::Rejected(format!("engine answered with status {code}"))
                }
                e => FarmError::Unreachable {
                    url: url.to_string(),
                    reason: e.to_string(),
                },
            })?;

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| FarmError::Rejected(e.to_string()))?;

        Ok(SubmissionHandle {
            id: Uuid::new_v4(),
            title: job.title.clone(),
            jid: parse_jid(&body),
            response: body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use katana::models::{args::Args, frame_range::FrameRange, toolchain::ToolchainConfig};

    fn job() -> FarmJob {
        let toolchain = ToolchainConfig::default().resolve(Some("3.1.2"));
        let range = FrameRange::new(1, 2).unwrap();
        let command = Args::new(&toolchain, "/proj/.shot010.katana", "render_bty", range);
        FarmJob::new("[west] [showA] [shot010] [render_bty] [1 - 2]", &command, &range)
    }

    #[test]
    fn quote_keeps_values_verbatim() {
        assert_eq!(quote("plain"), "{plain}");
        assert_eq!(quote("[west] [1 - 2] $x"), "{[west] [1 - 2] $x}");
        assert_eq!(quote(""), "{}");
        assert_eq!(quote("a{b}c"), r#""a\{b\}c""#);
        assert_eq!(
            quote(r"--katana-file=C:\shots\.a{1}.katana"),
            r#""--katana-file=C:\\shots\\.a\{1\}.katana""#
        );
        assert_eq!(quote(r#"say "hi" [now]\"#), r#""say \"hi\" \[now\]\\""#);
    }

    #[test]
    fn script_has_one_task_per_frame() {
        let script = to_alfred_script(&job());
        assert!(script.starts_with("##AlfredToDo 3.0\n"));
        assert!(script.contains(
            "Job -title {[west] [showA] [shot010] [render_bty] [1 - 2]} -service {Linux64} -priority 50 -subtasks {"
        ));
        assert_eq!(script.matches("    Task -title").count(), 2);
        assert!(script.contains("Task -title {1} -cmds"));
        assert!(script.contains("{--t=1-1}"));
        assert!(script.contains("{--t=2-2}"));
        assert!(script.find("{--t=1-1}").unwrap() < script.find("{--t=2-2}").unwrap());
        assert!(script.contains("RemoteCmd {{rez-env} {katana-3.1.2}"));
    }

    #[test]
    fn spool_url_carries_owner() {
        let client = TractorClient::new("ws01");
        let target = SpoolTarget {
            host: "10.0.0.80".to_owned(),
            port: 80,
            owner: "west".to_owned(),
        };
        assert_eq!(
            client.spool_url(&target).unwrap().as_str(),
            "http://10.0.0.80/Tractor/spool?owner=west&spoolhost=ws01"
        );
    }

    #[test]
    fn jid_from_reply() {
        assert_eq!(
            parse_jid(r#"{"rc": 0, "msg": "job script accepted, jid: 42"}"#),
            Some(42)
        );
        assert_eq!(parse_jid("accepted"), None);
    }
}
