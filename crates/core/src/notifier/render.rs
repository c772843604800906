//! Rendering of task state into Discord embed payloads.

use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskStatus};

/// Number of glyphs in a rendered progress bar.
pub const PROGRESS_BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordPayload {
    pub embeds: Vec<DiscordEmbed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordEmbed {
    pub title: String,
    pub fields: Vec<DiscordField>,
    pub color: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl DiscordField {
    fn new(name: &str, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
            inline,
        }
    }
}

/// Renders a task snapshot into the webhook payload.
///
/// Source and output paths are always present. Duration appears once the
/// probe is available while processing; timestamp, speed and the progress
/// bar appear once the encoder has reported progress.
pub fn render_payload(task: &Task) -> DiscordPayload {
    let mut fields = vec![
        DiscordField::new("Path", task.source_path.display().to_string(), false),
        DiscordField::new("Output path", task.output_path.display().to_string(), false),
    ];

    if task.status == TaskStatus::Processing {
        if let Some(probe) = &task.probe {
            let duration_secs = probe.duration_secs();
            fields.push(DiscordField::new(
                "Duration",
                format_duration(duration_secs),
                true,
            ));
            if let Some(progress) = &task.progress {
                let ratio = if duration_secs > 0.0 {
                    progress.timestamp_secs / duration_secs
                } else {
                    0.0
                };
                fields.push(DiscordField::new(
                    "Timestamp",
                    format_duration(progress.timestamp_secs),
                    true,
                ));
                fields.push(DiscordField::new("Speed", progress.speed.clone(), true));
                fields.push(DiscordField::new(
                    "Progress",
                    render_progress_bar(ratio),
                    false,
                ));
            }
        }
    }

    DiscordPayload {
        embeds: vec![DiscordEmbed {
            title: "Transcoding file".to_string(),
            fields,
            color: task.status.color(),
        }],
    }
}

/// Renders a fixed-width glyph bar with a percentage, e.g.
/// `██████████░░░░░░░░░░ 50.00%`. The ratio is clamped to [0, 1] so encoder
/// overshoot past the reported duration never renders above 100%.
pub fn render_progress_bar(ratio: f64) -> String {
    let ratio = if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let mut bar = String::with_capacity(PROGRESS_BAR_WIDTH * 3 + 8);
    for i in 0..PROGRESS_BAR_WIDTH {
        let cell = i as f64 / PROGRESS_BAR_WIDTH as f64;
        bar.push(if cell >= ratio { '░' } else { '█' });
    }
    bar.push_str(&format!(" {:.2}%", ratio * 100.0));
    bar
}

/// Formats a duration in seconds as `1h02m03s` / `2m03s` / `45s`.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{}h{:02}m{:02}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m{:02}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::TranscodeProgress;
    use crate::testing::fixtures::probe_result;

    fn task_with(status: TaskStatus) -> Task {
        let mut task = Task::new("/media/a.mkv".into(), "/media/a.out.mp4".into());
        if status != TaskStatus::Queued {
            task.transition(TaskStatus::Processing);
        }
        if status.is_terminal() {
            task.transition(status);
        }
        task
    }

    #[test]
    fn test_progress_bar_half_way() {
        let bar = render_progress_bar(0.5);
        let filled = bar.chars().filter(|c| *c == '█').count();
        let empty = bar.chars().filter(|c| *c == '░').count();
        assert_eq!(filled, 10);
        assert_eq!(empty, 10);
        assert!(bar.ends_with(" 50.00%"));
    }

    #[test]
    fn test_progress_bar_bounds() {
        assert!(render_progress_bar(0.0).starts_with('░'));
        assert!(render_progress_bar(0.0).ends_with(" 0.00%"));
        assert!(render_progress_bar(1.0).ends_with(" 100.00%"));
        assert_eq!(
            render_progress_bar(1.0).chars().filter(|c| *c == '█').count(),
            PROGRESS_BAR_WIDTH
        );
    }

    #[test]
    fn test_progress_bar_clamps_overshoot() {
        // Encoder can report timestamps past the probed duration
        assert_eq!(render_progress_bar(1.4), render_progress_bar(1.0));
        assert_eq!(render_progress_bar(-0.1), render_progress_bar(0.0));
        assert_eq!(render_progress_bar(f64::NAN), render_progress_bar(0.0));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45.0), "45s");
        assert_eq!(format_duration(123.9), "2m03s");
        assert_eq!(format_duration(7323.0), "2h02m03s");
        assert_eq!(format_duration(-5.0), "0s");
    }

    #[test]
    fn test_payload_queued_has_paths_only() {
        let payload = render_payload(&task_with(TaskStatus::Queued));
        let embed = &payload.embeds[0];
        assert_eq!(embed.title, "Transcoding file");
        assert_eq!(embed.color, 0xa855f7);
        assert_eq!(embed.fields.len(), 2);
        assert_eq!(embed.fields[0].name, "Path");
        assert_eq!(embed.fields[1].name, "Output path");
    }

    #[test]
    fn test_payload_processing_with_probe_adds_duration() {
        let mut task = task_with(TaskStatus::Processing);
        task.probe = Some(probe_result("120.0"));
        let payload = render_payload(&task);
        let embed = &payload.embeds[0];
        assert_eq!(embed.color, 0xf97316);
        assert_eq!(embed.fields.len(), 3);
        assert_eq!(embed.fields[2].name, "Duration");
        assert_eq!(embed.fields[2].value, "2m00s");
    }

    #[test]
    fn test_payload_processing_with_progress_renders_bar() {
        let mut task = task_with(TaskStatus::Processing);
        task.probe = Some(probe_result("120.0"));
        task.progress = Some(TranscodeProgress {
            speed: "1.02x".to_string(),
            timestamp_secs: 60.0,
        });
        let payload = render_payload(&task);
        let embed = &payload.embeds[0];
        assert_eq!(embed.fields.len(), 6);
        assert_eq!(embed.fields[3].name, "Timestamp");
        assert_eq!(embed.fields[3].value, "1m00s");
        assert_eq!(embed.fields[4].name, "Speed");
        assert_eq!(embed.fields[4].value, "1.02x");
        assert_eq!(embed.fields[5].name, "Progress");
        let bar = &embed.fields[5].value;
        assert_eq!(bar.chars().filter(|c| *c == '█').count(), 10);
        assert!(bar.ends_with(" 50.00%"));
    }

    #[test]
    fn test_payload_terminal_states_drop_progress_fields() {
        let mut task = task_with(TaskStatus::Done);
        task.probe = Some(probe_result("120.0"));
        task.progress = Some(TranscodeProgress::default());
        let payload = render_payload(&task);
        assert_eq!(payload.embeds[0].fields.len(), 2);
        assert_eq!(payload.embeds[0].color, 0x22c55e);

        let failed = render_payload(&task_with(TaskStatus::Failed));
        assert_eq!(failed.embeds[0].color, 0xef4444);
    }
}
