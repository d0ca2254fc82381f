use crate::types::{Category, Insight, InsightsBundle, Severity};

/// Decodes the insights-mode completion text into an [`InsightsBundle`].
///
/// The expected grammar is a sequence of blocks separated by `---` lines,
/// each block carrying `FIELD: value` lines (CATEGORY, PLAYER, SEVERITY,
/// DATA, RECOMMENDATION, LOSS_RATE). The upstream model is not schema
/// constrained, so this never fails: incomplete blocks, unknown categories,
/// and stray prose are dropped and the rest of the response is kept.
pub fn decode_insights(raw: &str) -> InsightsBundle {
    let mut bundle = InsightsBundle::default();
    let mut dropped = 0usize;

    for block in raw.split("---").filter(|b| !b.trim().is_empty()) {
        let mut fields = BlockFields::default();
        for line in block.lines().map(str::trim).filter(|l| !l.is_empty()) {
            fields.scan_line(line);
        }

        match fields.into_insight() {
            Some(insight) => bundle.bucket_mut(insight.category).push(insight),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, "decoder dropped incomplete or unrecognized blocks");
    }

    bundle
}

/// Field accumulator for one block. A repeated prefix overwrites the
/// earlier value, so the last occurrence wins.
#[derive(Debug, Default)]
struct BlockFields {
    category: Option<String>,
    player: Option<String>,
    severity: Option<Severity>,
    narrative: Option<String>,
    recommendation: Option<String>,
    loss_rate: Option<u32>,
}

impl BlockFields {
    fn scan_line(&mut self, line: &str) {
        if let Some(rest) = line.strip_prefix("CATEGORY:") {
            self.category = Some(rest.trim().to_ascii_lowercase());
        } else if let Some(rest) = line.strip_prefix("PLAYER:") {
            let player = rest.trim();
            // "Team" (exact case) marks a team-wide insight with no subject player.
            self.player = if player == "Team" {
                None
            } else {
                Some(player.to_string())
            };
        } else if let Some(rest) = line.strip_prefix("SEVERITY:") {
            self.severity = Some(Severity::from_label(rest.trim()));
        } else if let Some(rest) = line.strip_prefix("DATA:") {
            self.narrative = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("RECOMMENDATION:") {
            self.recommendation = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("LOSS_RATE:") {
            // Unparseable values store 0 rather than dropping the field.
            self.loss_rate = Some(rest.trim().parse().unwrap_or(0));
        }
    }

    /// The completeness gate: a block yields an Insight only if narrative,
    /// recommendation and severity were all captured and the category maps
    /// into the known bucket set.
    fn into_insight(self) -> Option<Insight> {
        let narrative = self.narrative?;
        let recommendation = self.recommendation?;
        let severity = self.severity?;
        let category = Category::from_label(self.category.as_deref()?)?;

        Some(Insight {
            category,
            player: self.player,
            narrative,
            recommendation,
            severity,
            loss_rate: self.loss_rate,
            sample_size: None,
        })
    }
}
