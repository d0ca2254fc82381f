use crate::types::MatchStats;

/// Prompt builders are pure: the same statistics (and question, for the
/// what-if builder) always produce byte-identical output. Map-valued
/// metrics come from BTreeMaps, so iteration order is stable.

pub fn build_insights_prompt(match_data: &MatchStats) -> String {
    let metrics = &match_data.metrics;

    let players = metrics
        .player_tendencies
        .iter()
        .map(|p| {
            format!(
                "\n{}:\n  - K/D Ratio: {}\n  - Avg Kills: {} per match\n  - Avg Deaths: {} per match\n  - First Kill Rate: {}%\n  - Top Agent: {} ({}% pick rate)\n  - Role: {}\n",
                p.player,
                fmt_opt(p.kd_ratio, 2),
                fmt_opt(p.avg_kills, 1),
                fmt_opt(p.avg_deaths, 1),
                fmt_opt(p.first_kill_rate, 1),
                p.top_agent.as_deref().unwrap_or("Unknown"),
                fmt_opt(p.top_agent_rate, 0),
                role_from_agent(p.top_agent.as_deref()),
            )
        })
        .collect::<Vec<_>>()
        .join("");

    let site_prefs = metrics
        .site_preferences
        .iter()
        .map(|(site, rate)| format!("- {} Site: {:.1}%", site, rate))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an expert VALORANT coach analyzing {team}'s performance data.

TEAM OVERVIEW:
- Team: {team}
- Matches Analyzed: {matches}
- Overall Win Rate: {win_rate:.1}%
- Playstyle: {style}
- Avg Round Duration: {avg_duration}s

PLAYER STATISTICS:
{players}

SITE ATTACK DISTRIBUTION:
{site_prefs}

YOUR TASK:
Analyze this data and generate EXACTLY 12 detailed, actionable insights distributed across all categories. Be comprehensive and thorough:

1. KAST CORRELATIONS (player survivability and impact) - GENERATE EXACTLY 3 INSIGHTS:
   - Identify players with concerning K/D ratios (below 0.9)
   - Players dying early in rounds without trading
   - Players not creating opening advantages (low first kill rate)
   - Role-specific effectiveness issues
   - Compare players to their role expectations

2. SETUP PATTERNS - GENERATE EXACTLY 3 INSIGHTS:
   - Identify predictable attack patterns
   - Site preference imbalances (>40% on one site or <20% on another)
   - Composition problems
   - Agent pick rate issues
   - Map-specific struggles

3. ECONOMY PATTERNS - GENERATE EXACTLY 3 INSIGHTS:
   - Overall win rate issues (if <50%)
   - Force buy tendencies
   - Economic decision-making problems
   - Round win conversion rates

4. TIMING PATTERNS - GENERATE EXACTLY 3 INSIGHTS:
   - Execute speed issues (too slow >50s or too fast <30s)
   - Rush rate problems
   - Late-round vulnerabilities

FORMAT EACH INSIGHT EXACTLY LIKE THIS (no markdown, no extra formatting):
---
CATEGORY: kast_correlations
PLAYER: OXY
SEVERITY: high
DATA: OXY has a 0.85 K/D ratio with 14.2 kills and 16.7 deaths per match, dying 2.5 times more than creating opening kills (first kill rate: 8.3%), which is below the expected 15%+ for a Duelist role.
RECOMMENDATION: Focus on positioning in post-plant situations and entry timing drills. Review VODs of early deaths to identify pattern recognition issues. Consider agent switch from Jett to Raze for more survivability on Haven/Bind.
LOSS_RATE: 62
---

CRITICAL REQUIREMENTS - YOU MUST FOLLOW THESE EXACTLY:
- MANDATORY: Generate EXACTLY 12 insights total (3 per category, no exceptions)
- MANDATORY: Each category (kast_correlations, setup_patterns, economy_patterns, timing_patterns) must have EXACTLY 3 insights
- MANDATORY: Be VERY specific with numbers from the data in every insight
- MANDATORY: Each DATA field must be 2-3 complete sentences with concrete statistics and percentages
- MANDATORY: Each RECOMMENDATION must be at least 50 words with detailed, actionable advice including specific drills or strategies
- MANDATORY: Compare players against role benchmarks (Duelists: 15%+ first kill rate, 1.1+ K/D; Controllers: 0.9+ K/D; Initiators: 12%+ FK, 1.0+ K/D; Sentinels: 0.95+ K/D)
- MANDATORY: Use exact numbers provided in the statistics above
- MANDATORY: SEVERITY levels must be accurate: critical (game-losing issues), high (major problems), medium (needs attention), low (minor tweaks)
- MANDATORY: Each insight must have clear CATEGORY, SEVERITY, DATA, RECOMMENDATION, and LOSS_RATE fields
- MANDATORY: Use PLAYER: Team for team-wide insights with no single subject player

Generate all 12 insights now (3 kast_correlations + 3 setup_patterns + 3 economy_patterns + 3 timing_patterns)."#,
        team = match_data.team_name,
        matches = match_data.matches_analyzed,
        win_rate = metrics.win_rate,
        style = metrics.aggression.style.as_deref().unwrap_or("Unknown"),
        avg_duration = fmt_opt(metrics.aggression.avg_duration, 1),
        players = players,
        site_prefs = site_prefs,
    )
}

pub fn build_macro_review_prompt(match_data: &MatchStats) -> String {
    let metrics = &match_data.metrics;

    let map_performance = metrics
        .win_rate_by_map
        .iter()
        .map(|(map, rate)| {
            let flag = if *rate < 45.0 {
                "🔴"
            } else if *rate > 60.0 {
                "✅"
            } else {
                "⚠"
            };
            format!("- {}: {:.1}% WR {}", map, rate, flag)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let site_prefs = metrics
        .site_preferences
        .iter()
        .map(|(site, rate)| format!("- {} Site: {:.1}%", site, rate))
        .collect::<Vec<_>>()
        .join("\n");

    let top_agents = metrics
        .agent_composition
        .iter()
        .take(5)
        .map(|a| format!("- {}: {}% pick rate", a.agent, a.pick_rate))
        .collect::<Vec<_>>()
        .join("\n");

    let top_players = metrics
        .player_tendencies
        .iter()
        .take(3)
        .map(|p| {
            format!(
                "- {}: {} K/D, {}% FK rate, {} main",
                p.player,
                fmt_opt(p.kd_ratio, 2),
                fmt_opt(p.first_kill_rate, 1),
                p.top_agent.as_deref().unwrap_or("Unknown"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let avg_duration = fmt_opt(metrics.aggression.avg_duration, 1);
    let rush_rate = fmt_opt(metrics.aggression.rush_rate, 1);
    let style = metrics.aggression.style.as_deref().unwrap_or("Unknown");

    format!(
        r#"You are a professional VALORANT coach creating a detailed post-match review agenda for {team}.

MATCH DATA:
- Team: {team}
- Matches Analyzed: {matches}
- Overall Win Rate: {win_rate:.1}%
- Playstyle: {style}
- Average Round Duration: {avg_duration}s
- Rush Rate: {rush_rate}%

MAP PERFORMANCE:
{map_performance}

SITE ATTACK DISTRIBUTION:
{site_prefs}

TOP AGENTS:
{top_agents}

PLAYER STATS (Top 3):
{top_players}

YOUR TASK:
Create a COMPREHENSIVE and DETAILED 6-section post-match review agenda with markdown tables, statistics, and actionable recommendations. MANDATORY: This MUST be 500-700 words minimum (not including tables).

## FORMAT REQUIREMENTS:

# {team_upper} MACRO REVIEW AGENDA

## 1. Pistol Round Performance (80-100 words)
- Create a markdown table showing pistol round win rates by map
- Analyze pistol round site preferences and attack patterns
- Compare vs team's overall win rate
- Flag critical issues with 🔴, concerns with ⚠️, strengths with ✅
- Provide 2-3 specific drills or strategy adjustments

Example table:
| Map | Pistol WR | Overall WR | Difference | Status |
|-----|-----------|------------|------------|--------|
| Haven | 45% | 50% | -5% | ⚠️ |

## 2. Economy Management (100-120 words)
- Analyze overall win rate and economic discipline
- If <50% win rate, flag as 🔴 CRITICAL and explain economic cascades
- Discuss force buy patterns, eco discipline, and bonus round conversion
- Compare economic decisions across different maps
- Provide specific economic guidelines (when to force, when to save)
- Include a table of win rates by economy type if data available

## 3. Mid-Round Execution & Timing (80-100 words)
- Analyze average round duration ({avg_duration}s) - flag if >50s or <35s
- Break down rush rate ({rush_rate}%) - ideal is 25-35%
- Discuss site hit timing, default setups, and adaptation speed
- Analyze playstyle ({style}) effectiveness
- Recommend specific timing adjustments and practice scenarios
- Include comparison to pro team benchmarks

## 4. Site Selection Strategy (80-100 words)
- Create a markdown table of site attack distribution
- Flag heavy bias to one site (>40%) as ⚠️ predictable
- Flag underutilized sites (<25%) as missed opportunities
- Analyze correlation between site preference and win rate
- Recommend site diversification strategies
- Suggest fake/pressure plays to keep opponents guessing

## 5. Map Pool & Performance (100-120 words)
- Create comprehensive table of map performance with the following columns:
  - Map name
  - Win Rate %
  - Matches Played
  - Status (🔴 <45%, ⚠️ 45-55%, ✅ >55%)
  - Priority Level (High/Medium/Low)
- For each weak map (<45% WR): provide 2-3 specific issues and practice recommendations
- For each strong map (>60% WR): identify what's working and how to maintain it
- Recommend map veto strategy for upcoming matches

## 6. Agent Composition & Role Distribution (60-80 words)
- Analyze top 5 agents and their pick rates
- Identify composition gaps or over-reliance on specific agents
- Compare agent performance to team success
- Recommend agent pool expansions for flexibility
- Suggest alternative compositions for struggling maps

---
## 📊 PRIORITY ACTION ITEMS

**🔴 Critical (Must Fix This Week):**
1. [Highest severity issue with specific metric]
2. [Second critical issue]

**⚠️ High Priority (Address in Next 2 Weeks):**
1. [Important issue]
2. [Important issue]

**💡 Optimization Opportunities:**
1. [Enhancement suggestion]
2. [Enhancement suggestion]

---
## 🎯 NEXT PRACTICE FOCUS

**This Week's Drills:**
- [Specific drill name]: [30-50 words describing exact drill, duration, success metrics]
- [Specific drill name]: [30-50 words describing exact drill, duration, success metrics]
- [Specific drill name]: [30-50 words describing exact drill, duration, success metrics]

**VOD Review Focus:**
- [Specific rounds/situations to review]

---

CRITICAL REQUIREMENTS - YOU MUST FOLLOW THESE EXACTLY:
- MANDATORY: Use markdown tables extensively (minimum 4 tables across all sections)
- MANDATORY: Include specific percentages and numbers in EVERY single section
- MANDATORY: Be brutally honest about weaknesses with data to back it up
- MANDATORY: Provide actionable drills with specific success metrics and time durations
- MANDATORY: Total length MUST be 500-700 words minimum (not counting table content)
- MANDATORY: Use 🔴 for critical issues (<45% WR), ⚠️ for concerns (45-55% WR), ✅ for strengths (>55% WR)
- MANDATORY: Every section must have detailed analysis, not just bullet points
- MANDATORY: Priority Action Items section must list at least 2 critical, 2 high priority, and 2 optimization items
- MANDATORY: Practice drills section must have at least 3 specific drills with exact durations and success criteria

Generate the complete detailed agenda now. Make it comprehensive and thorough."#,
        team = match_data.team_name,
        team_upper = match_data.team_name.to_uppercase(),
        matches = match_data.matches_analyzed,
        win_rate = metrics.win_rate,
        style = style,
        avg_duration = avg_duration,
        rush_rate = rush_rate,
        map_performance = map_performance,
        site_prefs = site_prefs,
        top_agents = top_agents,
        top_players = top_players,
    )
}

pub fn build_what_if_prompt(query: &str, match_data: &MatchStats) -> String {
    let metrics = &match_data.metrics;

    let mut maps: Vec<(&String, &f64)> = metrics.win_rate_by_map.iter().collect();
    maps.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
    let best_maps = maps
        .into_iter()
        .take(3)
        .map(|(map, rate)| format!("- {}: {:.1}% WR", map, rate))
        .collect::<Vec<_>>()
        .join("\n");

    let top_players = metrics
        .player_tendencies
        .iter()
        .take(3)
        .map(|p| {
            format!(
                "- {}: {} K/D, {}% FK rate",
                p.player,
                fmt_opt(p.kd_ratio, 2),
                fmt_opt(p.first_kill_rate, 1),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an expert VALORANT strategist and analyst with deep knowledge of competitive play, win probabilities, and tactical decision-making.

{team_upper} TEAM CONTEXT:
- Overall Win Rate: {win_rate:.1}%
- Playstyle: {style}
- Avg Round Duration: {avg_duration}s
- Rush Rate: {rush_rate}%

BEST/WORST MAPS:
{best_maps}

PLAYER OVERVIEW (Top performers):
{top_players}

USER'S HYPOTHETICAL QUESTION:
"{query}"

YOUR TASK:
Analyze this hypothetical scenario and provide a detailed strategic analysis.

## FORMAT YOUR RESPONSE AS:

# WHAT-IF ANALYSIS

## SCENARIO UNDERSTANDING
[Parse and clarify what the user is asking about. Extract key details: round number, player counts, site, time remaining, economy state if mentioned]

## GAME STATE ANALYSIS
[Analyze the situation mentioned in the query. What were the key factors?]
- Player Count: [e.g., "3v5 disadvantage"]
- Economy Impact: [Consider weapon values, next round economy]
- Time Pressure: [If mentioned, analyze time constraints]
- Site/Position: [Tactical position analysis]

## ACTUAL DECISION ANALYSIS
What was done: [Describe the actual decision from the query]
Win Probability: [Estimate based on VALORANT knowledge, e.g., "3v5 retake ~12-18%"]
Risks:
- [List specific risks of this decision]
- [Economic consequences]
- [Tactical downsides]

## ALTERNATIVE SCENARIO
Suggested Alternative: [The alternative being proposed]
Win Probability: [Estimate probability, e.g., "Save → guarantee full buy next round"]
Benefits:
- [List specific benefits]
- [Economic advantages]
- [Strategic positioning for next round]

## RECOMMENDATION
**Verdict:** [Which decision was better and why]

**Reasoning:**
[Explain the strategic principle behind your recommendation. Reference {team}'s specific stats if relevant]

**General Principle:**
[State the broader VALORANT strategic lesson]

---

Generate a thorough analysis. Use specific VALORANT knowledge about retake probabilities, economy rules, and tactical principles. Be definitive in your recommendation."#,
        team = match_data.team_name,
        team_upper = match_data.team_name.to_uppercase(),
        win_rate = metrics.win_rate,
        style = metrics.aggression.style.as_deref().unwrap_or("Unknown"),
        avg_duration = fmt_opt(metrics.aggression.avg_duration, 1),
        rush_rate = fmt_opt(metrics.aggression.rush_rate, 1),
        best_maps = best_maps,
        top_players = top_players,
        query = query,
    )
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "Unknown".to_string(),
    }
}

fn role_from_agent(agent: Option<&str>) -> &'static str {
    let Some(agent) = agent else {
        return "Unknown";
    };

    match agent.to_ascii_lowercase().as_str() {
        "jett" | "raze" | "phoenix" | "reyna" | "yoru" | "neon" => "Duelist",
        "omen" | "brimstone" | "viper" | "astra" | "harbor" | "clove" => "Controller",
        "sova" | "breach" | "skye" | "kayo" | "fade" | "gekko" => "Initiator",
        "sage" | "cypher" | "killjoy" | "chamber" | "deadlock" | "vyse" => "Sentinel",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AgentPick, Aggression, MatchStats, Metrics, PlayerTendency};

    fn sample_stats() -> MatchStats {
        MatchStats {
            team_name: "Cloud9".to_string(),
            matches_analyzed: 24,
            metrics: Metrics {
                win_rate: 48.5,
                win_rate_by_map: [
                    ("Bind".to_string(), 41.2),
                    ("Haven".to_string(), 55.0),
                    ("Lotus".to_string(), 62.5),
                ]
                .into_iter()
                .collect(),
                site_preferences: [("A".to_string(), 46.0), ("B".to_string(), 32.0)]
                    .into_iter()
                    .collect(),
                aggression: Aggression {
                    style: Some("Aggressive".to_string()),
                    avg_duration: Some(42.3),
                    rush_rate: Some(31.0),
                },
                agent_composition: vec![AgentPick {
                    agent: "jett".to_string(),
                    pick_rate: 88.0,
                }],
                player_tendencies: vec![PlayerTendency {
                    player: "OXY".to_string(),
                    kd_ratio: Some(0.85),
                    avg_kills: Some(14.2),
                    avg_deaths: Some(16.7),
                    first_kill_rate: Some(8.3),
                    top_agent: Some("jett".to_string()),
                    top_agent_rate: Some(72.0),
                }],
            },
        }
    }

    #[test]
    fn builders_are_deterministic() {
        let stats = sample_stats();
        assert_eq!(build_insights_prompt(&stats), build_insights_prompt(&stats));
        assert_eq!(
            build_macro_review_prompt(&stats),
            build_macro_review_prompt(&stats)
        );
        assert_eq!(
            build_what_if_prompt("Should we have saved on round 19?", &stats),
            build_what_if_prompt("Should we have saved on round 19?", &stats)
        );
    }

    #[test]
    fn insights_prompt_embeds_stats_and_grammar() {
        let prompt = build_insights_prompt(&sample_stats());

        assert!(prompt.contains("Overall Win Rate: 48.5%"));
        assert!(prompt.contains("K/D Ratio: 0.85"));
        assert!(prompt.contains("Role: Duelist"));
        assert!(prompt.contains("CATEGORY: kast_correlations"));
        assert!(prompt.contains("LOSS_RATE:"));
    }

    #[test]
    fn missing_optionals_render_as_unknown() {
        let mut stats = sample_stats();
        stats.metrics.aggression = Aggression::default();
        stats.metrics.player_tendencies[0].kd_ratio = None;
        stats.metrics.player_tendencies[0].top_agent = None;

        let prompt = build_insights_prompt(&stats);
        assert!(prompt.contains("Playstyle: Unknown"));
        assert!(prompt.contains("Avg Round Duration: Unknowns"));
        assert!(prompt.contains("K/D Ratio: Unknown"));
        assert!(prompt.contains("Role: Unknown"));
    }

    #[test]
    fn what_if_prompt_orders_maps_by_win_rate() {
        let prompt = build_what_if_prompt("What if we banned Bind?", &sample_stats());

        let lotus = prompt.find("- Lotus: 62.5% WR").unwrap();
        let haven = prompt.find("- Haven: 55.0% WR").unwrap();
        let bind = prompt.find("- Bind: 41.2% WR").unwrap();
        assert!(lotus < haven && haven < bind);
        assert!(prompt.contains("\"What if we banned Bind?\""));
    }

    #[test]
    fn macro_prompt_flags_map_performance() {
        let prompt = build_macro_review_prompt(&sample_stats());

        assert!(prompt.contains("- Bind: 41.2% WR 🔴"));
        assert!(prompt.contains("- Haven: 55.0% WR ⚠"));
        assert!(prompt.contains("- Lotus: 62.5% WR ✅"));
        assert!(prompt.contains("# CLOUD9 MACRO REVIEW AGENDA"));
    }
}
