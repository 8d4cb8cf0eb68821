//! Fetch → parse → render → write, one feed source at a time.
//!
//! Sources are processed sequentially in configuration order. A source whose
//! feed yields no valid entries is skipped without writing a file. A fetch
//! failure aborts the run; scripts already written for earlier sources are
//! left in place.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::FeedSource;
use crate::fetcher::{FeedTransport, Fetcher};
use crate::fs_abstraction::FileSystem;
use crate::render::ScriptRenderer;
use crate::utils::format_count;
use crate::validation::AddressFamily;

/// What happened to one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FamilyOutcome {
    /// Script written to `path`
    Written { path: PathBuf },
    /// Script printed to stdout (dry run)
    Printed,
    /// Feed had no valid entries, nothing rendered
    SkippedEmpty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyReport {
    pub family: AddressFamily,
    pub list_name: String,
    pub entries: usize,
    pub skipped_lines: usize,
    pub outcome: FamilyOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub reports: Vec<FamilyReport>,
}

impl RunSummary {
    /// Number of scripts written to disk
    pub fn written(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, FamilyOutcome::Written { .. }))
            .count()
    }

    pub fn total_entries(&self) -> usize {
        self.reports.iter().map(|r| r.entries).sum()
    }
}

/// Location of the script generated for `list_name`
pub fn script_path(output_dir: &Path, list_name: &str) -> PathBuf {
    output_dir.join(format!("{}.rsc", list_name))
}

pub struct Pipeline<'a, T> {
    fetcher: &'a Fetcher<T>,
    renderer: &'a dyn ScriptRenderer,
    fs: &'a dyn FileSystem,
    output_dir: PathBuf,
    dry_run: bool,
}

impl<'a, T: FeedTransport> Pipeline<'a, T> {
    pub fn new(
        fetcher: &'a Fetcher<T>,
        renderer: &'a dyn ScriptRenderer,
        fs: &'a dyn FileSystem,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fetcher,
            renderer,
            fs,
            output_dir: output_dir.into(),
            dry_run: false,
        }
    }

    /// Print scripts to stdout instead of writing them
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Process every source in order
    pub async fn run(&self, sources: &[FeedSource]) -> Result<RunSummary> {
        if !self.dry_run {
            self.ensure_output_dir()?;
        }

        let mut summary = RunSummary::default();
        for source in sources {
            let report = self.process(source).await?;
            summary.reports.push(report);
        }

        Ok(summary)
    }

    async fn process(&self, source: &FeedSource) -> Result<FamilyReport> {
        info!("Fetching {} addresses from {}...", source.family, source.url);

        let feed = self
            .fetcher
            .fetch_feed(source)
            .await
            .with_context(|| format!("Failed to fetch {}", source.list_name))?;

        let mut report = FamilyReport {
            family: source.family,
            list_name: source.list_name.clone(),
            entries: feed.entries.len(),
            skipped_lines: feed.skipped,
            outcome: FamilyOutcome::SkippedEmpty,
        };

        if feed.is_empty() {
            info!(
                "No valid {} addresses found for {}.",
                source.family, source.list_name
            );
            return Ok(report);
        }

        info!(
            "Found {} {} addresses. Generating RouterOS script for {}...",
            format_count(feed.entries.len()),
            source.family,
            source.list_name
        );
        let script = self
            .renderer
            .render(&feed.entries, &source.list_name, &source.command_path);

        report.outcome = if self.dry_run {
            print!("{}", script);
            FamilyOutcome::Printed
        } else {
            let path = script_path(&self.output_dir, &source.list_name);
            self.fs
                .write(&path, script.as_bytes())
                .with_context(|| format!("Failed to write script: {:?}", path))?;
            info!("Script saved to {}", path.display());
            FamilyOutcome::Written { path }
        };

        Ok(report)
    }

    fn ensure_output_dir(&self) -> Result<()> {
        if self.fs.exists(&self.output_dir) {
            return Ok(());
        }

        debug!("Creating output directory {}", self.output_dir.display());
        self.fs
            .create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create output directory: {:?}", self.output_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::fetcher::{MockFeedTransport, RetryPolicy};
    use crate::fs_abstraction::MockFileSystem;
    use crate::render::MockScriptRenderer;
    use std::io;
    use std::time::Duration;

    const V4_BODY: &str = "{\"cidr\":\"192.0.2.0/24\"}\n{\"cidr\":\"bad\"}\n";

    fn sources() -> Vec<FeedSource> {
        AddressFamily::ALL
            .into_iter()
            .map(FeedSource::for_family)
            .collect()
    }

    fn fetcher(transport: MockFeedTransport) -> Fetcher<MockFeedTransport> {
        Fetcher::new(
            transport,
            RetryPolicy {
                max_attempts: 3,
                delay: Duration::from_millis(1000),
            },
        )
    }

    fn existing_dir_fs() -> MockFileSystem {
        let mut fs = MockFileSystem::new();
        fs.expect_exists()
            .withf(|p| p == Path::new("build"))
            .returning(|_| true);
        fs
    }

    #[tokio::test]
    async fn test_empty_feeds_are_never_rendered() {
        let mut transport = MockFeedTransport::new();
        transport
            .expect_get()
            .times(2)
            .returning(|_| Ok(String::new()));

        let mut renderer = MockScriptRenderer::new();
        renderer.expect_render().times(0);

        let mut fs = existing_dir_fs();
        fs.expect_write().times(0);

        let fetcher = fetcher(transport);
        let summary = Pipeline::new(&fetcher, &renderer, &fs, "build")
            .run(&sources())
            .await
            .unwrap();

        assert_eq!(summary.reports.len(), 2);
        assert!(summary
            .reports
            .iter()
            .all(|r| r.outcome == FamilyOutcome::SkippedEmpty && r.skipped_lines == 0));
        assert_eq!(summary.written(), 0);
    }

    #[tokio::test]
    async fn test_writes_script_for_non_empty_family() {
        let mut transport = MockFeedTransport::new();
        transport
            .expect_get()
            .withf(|url| url.ends_with("drop_v4.json"))
            .times(1)
            .returning(|_| Ok(V4_BODY.to_string()));
        transport
            .expect_get()
            .withf(|url| url.ends_with("drop_v6.json"))
            .times(1)
            .returning(|_| Ok("{\"type\":\"metadata\"}\n".to_string()));

        let mut renderer = MockScriptRenderer::new();
        renderer
            .expect_render()
            .withf(|entries, list_name, command_path| {
                entries.len() == 1
                    && entries[0] == "192.0.2.0/24"
                    && list_name == "spamhaus-drop-v4"
                    && command_path == "/ip"
            })
            .times(1)
            .returning(|_, _, _| "SCRIPT".to_string());

        let mut fs = existing_dir_fs();
        fs.expect_write()
            .withf(|p, c| p == Path::new("build/spamhaus-drop-v4.rsc") && c == b"SCRIPT")
            .times(1)
            .returning(|_, _| Ok(()));

        let fetcher = fetcher(transport);
        let summary = Pipeline::new(&fetcher, &renderer, &fs, "build")
            .run(&sources())
            .await
            .unwrap();

        assert_eq!(
            summary.reports[0],
            FamilyReport {
                family: AddressFamily::V4,
                list_name: "spamhaus-drop-v4".to_string(),
                entries: 1,
                skipped_lines: 1,
                outcome: FamilyOutcome::Written {
                    path: PathBuf::from("build/spamhaus-drop-v4.rsc"),
                },
            }
        );
        assert_eq!(summary.reports[1].outcome, FamilyOutcome::SkippedEmpty);
        assert_eq!(summary.reports[1].skipped_lines, 1);
        assert_eq!(summary.written(), 1);
        assert_eq!(summary.total_entries(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_aborts_run() {
        let mut transport = MockFeedTransport::new();
        transport
            .expect_get()
            .withf(|url| url.ends_with("drop_v4.json"))
            .times(3)
            .returning(|_| Err(FetchError::Status(503)));
        transport
            .expect_get()
            .withf(|url| url.ends_with("drop_v6.json"))
            .times(0);

        let mut renderer = MockScriptRenderer::new();
        renderer.expect_render().times(0);

        let mut fs = existing_dir_fs();
        fs.expect_write().times(0);

        let fetcher = fetcher(transport);
        let err = Pipeline::new(&fetcher, &renderer, &fs, "build")
            .run(&sources())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("spamhaus-drop-v4"));
        assert!(matches!(
            err.downcast_ref::<FetchError>(),
            Some(FetchError::Exhausted { attempts: 3, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_failure_keeps_earlier_script() {
        let mut transport = MockFeedTransport::new();
        transport
            .expect_get()
            .withf(|url| url.ends_with("drop_v4.json"))
            .times(1)
            .returning(|_| Ok(V4_BODY.to_string()));
        transport
            .expect_get()
            .withf(|url| url.ends_with("drop_v6.json"))
            .times(3)
            .returning(|_| Err(FetchError::Transport("timed out".into())));

        let mut renderer = MockScriptRenderer::new();
        renderer
            .expect_render()
            .times(1)
            .returning(|_, _, _| "SCRIPT".to_string());

        let mut fs = existing_dir_fs();
        fs.expect_write().times(1).returning(|_, _| Ok(()));

        let fetcher = fetcher(transport);
        let result = Pipeline::new(&fetcher, &renderer, &fs, "build")
            .run(&sources())
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_creates_missing_output_dir() {
        let mut transport = MockFeedTransport::new();
        transport
            .expect_get()
            .returning(|_| Ok(String::new()));

        let renderer = MockScriptRenderer::new();

        let mut fs = MockFileSystem::new();
        fs.expect_exists().times(1).returning(|_| false);
        fs.expect_create_dir_all()
            .withf(|p| p == Path::new("out/scripts"))
            .times(1)
            .returning(|_| Ok(()));

        let fetcher = fetcher(transport);
        let summary = Pipeline::new(&fetcher, &renderer, &fs, "out/scripts")
            .run(&sources()[..1])
            .await
            .unwrap();

        assert_eq!(summary.reports.len(), 1);
    }

    #[tokio::test]
    async fn test_output_dir_failure_is_reported() {
        let transport = MockFeedTransport::new();
        let renderer = MockScriptRenderer::new();

        let mut fs = MockFileSystem::new();
        fs.expect_exists().returning(|_| false);
        fs.expect_create_dir_all().returning(|_| {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        });

        let fetcher = fetcher(transport);
        let err = Pipeline::new(&fetcher, &renderer, &fs, "build")
            .run(&sources())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Failed to create output directory"));
    }

    #[tokio::test]
    async fn test_dry_run_touches_no_files() {
        let mut transport = MockFeedTransport::new();
        transport
            .expect_get()
            .returning(|_| Ok(V4_BODY.to_string()));

        let mut renderer = MockScriptRenderer::new();
        renderer
            .expect_render()
            .times(1)
            .returning(|_, _, _| String::new());

        let mut fs = MockFileSystem::new();
        fs.expect_exists().times(0);
        fs.expect_create_dir_all().times(0);
        fs.expect_write().times(0);

        let fetcher = fetcher(transport);
        let summary = Pipeline::new(&fetcher, &renderer, &fs, "build")
            .dry_run(true)
            .run(&sources()[..1])
            .await
            .unwrap();

        assert_eq!(summary.reports[0].outcome, FamilyOutcome::Printed);
        assert_eq!(summary.written(), 0);
    }

    #[test]
    fn test_script_path() {
        assert_eq!(
            script_path(Path::new("build"), "spamhaus-drop-v6"),
            PathBuf::from("build/spamhaus-drop-v6.rsc")
        );
    }
}
