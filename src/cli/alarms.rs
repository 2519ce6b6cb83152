//! mytasks alarms command implementation
//!
//! One-shot mode reports tasks due within the lead time and exits.
//! `--watch` keeps a scanner alive, reloading the data files on every tick
//! until interrupted.

use std::time::Duration as StdDuration;

use serde::Serialize;

use super::CommonOptions;
use crate::alarm::{Alarm, AlarmScanner};
use crate::config::describe_duration;
use crate::error::{Error, Result};
use crate::model::now_local;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::TaskStore;

/// Options for `mytasks alarms`
pub struct AlarmsOptions {
    pub watch: bool,
    pub common: CommonOptions,
}

#[derive(Serialize)]
struct AlarmsReport {
    lead_time: String,
    alarms: Vec<Alarm>,
}

pub fn run(options: AlarmsOptions) -> Result<()> {
    let store = options.common.open_store()?;
    let lead = store.config().alarms.lead_time()?;
    let mut scanner = AlarmScanner::new(lead);

    if options.watch {
        let interval = store
            .config()
            .alarms
            .check_interval()?
            .to_std()
            .map_err(|err| Error::InvalidConfig(format!("alarms.check_interval: {err}")))?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        return runtime.block_on(watch(store, scanner, interval, options.common.output()));
    }

    let alarms = scanner.scan(&store, now_local());
    let lead_text = describe_duration(lead);

    let mut human = HumanOutput::new(format!("mytasks alarms: {} due within {}", alarms.len(), lead_text));
    for alarm in &alarms {
        human.push_detail(alarm.message.clone());
    }

    let report = AlarmsReport {
        lead_time: lead_text,
        alarms,
    };
    emit_success(options.common.output(), "alarms", &report, Some(&human))?;
    Ok(())
}

async fn watch(
    mut store: TaskStore,
    mut scanner: AlarmScanner,
    interval: StdDuration,
    output: OutputOptions,
) -> Result<()> {
    tracing::info!(
        lead = %describe_duration(scanner.lead()),
        interval_secs = interval.as_secs(),
        "watching for due tasks"
    );
    if !output.json && !output.quiet {
        println!(
            "Watching for tasks due within {} (Ctrl-C to stop)",
            describe_duration(scanner.lead())
        );
    }

    let mut ticker = tokio::time::interval(interval);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(err) = store.load() {
                    tracing::warn!(error = %err, "reload failed, keeping previous data");
                }
                for alarm in scanner.scan(&store, now_local()) {
                    emit_alarm(output, &alarm)?;
                }
            }
            _ = &mut ctrl_c => {
                tracing::info!(alerted = scanner.triggered_count(), "alarm watch stopped");
                break;
            }
        }
    }

    Ok(())
}

fn emit_alarm(output: OutputOptions, alarm: &Alarm) -> Result<()> {
    if output.json {
        // One compact object per line while watching
        println!("{}", serde_json::to_string(alarm)?);
    } else if !output.quiet {
        println!("[{}] {}", now_local().format("%H:%M"), alarm.message);
    }
    Ok(())
}
