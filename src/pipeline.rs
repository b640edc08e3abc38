//! The four steps of a run: load, derive, render, deliver.

use share_config::{Credentials, ShareConfig};
use share_core::{Report, Result};
use share_telegram::{format_summary, TelegramBot};
use share_theme::PlotStyle;
use std::path::{Path, PathBuf};
use tracing::info;

/// CLI values that take precedence over `share.toml`.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub bins: Option<usize>,
}

impl Overrides {
    pub fn apply(self, config: &mut ShareConfig) {
        if let Some(dir) = self.data_dir {
            config.data.dir = dir;
        }
        if let Some(output) = self.output {
            config.plot.output = output;
        }
        if let Some(bins) = self.bins {
            config.plot.bins = bins;
        }
    }
}

/// Load the data directory and render the figure.
pub fn prepare(config: &ShareConfig) -> Result<(Report, PathBuf)> {
    let report = share_system::load_report(&config.data.dir)?;
    let style = PlotStyle::from_config(&config.plot);
    let plot = share_renderer::render(&report.telemetry, &style, &config.plot.output)?;
    Ok((report, plot))
}

/// Send the figure, then the summary text.
pub async fn deliver(
    config: &ShareConfig,
    creds: &Credentials,
    report: &Report,
    plot: &Path,
) -> Result<()> {
    let bot = TelegramBot::from_config(creds, &config.telegram)?;
    let text = format_summary(report);

    bot.send_photo(&creds.chat_id, plot).await?;
    bot.send_message(&creds.chat_id, &text).await?;

    info!("Report for '{}' delivered", report.host.host_name);
    Ok(())
}

/// Machine-readable form of a report for `share report --json`.
pub fn report_json(report: &Report, plot: &Path) -> serde_json::Value {
    serde_json::json!({
        "host": report.host.host_name,
        "distro": report.host.distro_name(),
        "size": report.telemetry.size(),
        "averages": report.averages,
        "plot": plot,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use share_config::ChatId;
    use std::fs;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn populate(dir: &Path) {
        let files = [
            ("numCores.txt", "2\n"),
            ("cpuLoad.txt", "0.5\n1.5\n"),
            ("cpuTemp.txt", "40000\n42000\n"),
            ("memFree.txt", "750\n250\n"),
            ("memTotal.txt", "1000\n"),
            ("distroName.txt", "Arch Linux\n"),
            ("hostName.txt", "laptop\n"),
        ];
        for (name, body) in files {
            fs::write(dir.join(name), body).unwrap();
        }
    }

    #[test]
    fn overrides_replace_only_given_values() {
        let mut config = ShareConfig::default();
        Overrides {
            data_dir: Some("/srv/telemetry".into()),
            output: None,
            bins: Some(12),
        }
        .apply(&mut config);

        assert_eq!(config.data.dir, PathBuf::from("/srv/telemetry"));
        assert_eq!(config.plot.output, PathBuf::from("./plot.png"));
        assert_eq!(config.plot.bins, 12);
    }

    #[test]
    fn prepare_loads_and_renders() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path());

        let mut config = ShareConfig::default();
        config.data.dir = dir.path().to_path_buf();
        config.plot.output = dir.path().join("out.png");
        config.plot.dpi = 40;

        let (report, plot) = prepare(&config).unwrap();
        assert!(plot.exists());
        assert_eq!(report.averages.cpu, 50.0);
        assert_eq!(report.averages.ram, 50.0);

        let json = report_json(&report, &plot);
        assert_eq!(json["host"], "laptop");
        assert_eq!(json["distro"], "Arch Linux");
        assert_eq!(json["averages"]["gpu"], "N/A");
        assert_eq!(json["size"], 2);
    }

    #[test]
    fn prepare_fails_without_data() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ShareConfig::default();
        config.data.dir = dir.path().join("missing");
        config.plot.output = dir.path().join("out.png");

        assert!(prepare(&config).is_err());
        assert!(!config.plot.output.exists());
    }

    fn delivery_setup(dir: &Path, server: &MockServer) -> (ShareConfig, Credentials, Report, PathBuf) {
        populate(dir);
        let plot = dir.join("plot.png");
        fs::write(&plot, b"PNG-plot-bytes").unwrap();

        let mut config = ShareConfig::default();
        config.telegram.api_base = server.uri();
        config.telegram.timeout_secs = 5;
        let creds = Credentials {
            token: "42:token".into(),
            chat_id: ChatId::Id(-1001),
        };
        let report = share_system::load_report(dir).unwrap();
        (config, creds, report, plot)
    }

    fn ok() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}}))
    }

    #[tokio::test]
    async fn deliver_sends_photo_before_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot42:token/sendPhoto"))
            .respond_with(ok())
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/bot42:token/sendMessage"))
            .respond_with(ok())
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let (config, creds, report, plot) = delivery_setup(dir.path(), &server);
        deliver(&config, &creds, &report, &plot).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let paths: Vec<&str> = requests.iter().map(|r| r.url.path()).collect();
        assert_eq!(paths, ["/bot42:token/sendPhoto", "/bot42:token/sendMessage"]);

        let body: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
        assert_eq!(body["chat_id"], -1001);
        assert_eq!(body["text"], format_summary(&report));
    }

    #[tokio::test]
    async fn failed_photo_skips_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot42:token/sendPhoto"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: PHOTO_INVALID_DIMENSIONS"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/bot42:token/sendMessage"))
            .respond_with(ok())
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let (config, creds, report, plot) = delivery_setup(dir.path(), &server);
        let err = deliver(&config, &creds, &report, &plot).await.unwrap_err();
        assert!(err.to_string().contains("PHOTO_INVALID_DIMENSIONS"));
    }
}
