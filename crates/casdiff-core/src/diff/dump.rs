//! Human-readable dump of a diff result.

use crate::diff::result::DiffResult;

/// Render one `===` line per position with its agreement and completeness.
///
/// Positions that disagree or are incomplete are followed by their
/// configurations, each preceded by a blank line. The dump is informational
/// only and is not meant to be parsed.
pub fn render_dump(result: &DiffResult) -> String {
    let mut out = String::new();

    for set in result.configuration_sets() {
        let agree = result.is_agreement(set);
        let complete = result.is_complete(set);
        out.push_str(&format!(
            "=== {} -> {} {}\n",
            set.position(),
            if agree { "AGREE" } else { "DISAGREE" },
            if complete { "COMPLETE" } else { "INCOMPLETE" }
        ));

        if !agree || !complete {
            for cfg in set.configurations() {
                out.push('\n');
                out.push_str(&cfg.to_string());
                if cfg.is_stacked() {
                    out.push_str(" (stacked)");
                }
                out.push('\n');
            }
        }
    }

    out
}
