use chrono::{DateTime, Duration, Utc};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::evaluation::Evaluation;
use crate::influencer::Influencer;
use crate::scoring::{BrandFit, Recommendation, RankEntry, ScoreBreakdown, WeightProfile};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Display form of a 0-100 score: one decimal, "-" when absent
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) if s.is_finite() => format!("{:.1}", s),
        _ => "-".to_string(),
    }
}

/// Format a follower count in compact notation (1.5k, 2.3M, 847)
pub fn format_followers(count: u64) -> String {
    let count = count as f64;
    // Thousands at the one decimal shown, so 999_950 moves up to "1M"
    let thousands = (count / 100.0).round() / 10.0;
    let formatted = if thousands >= 1_000.0 {
        format!("{:.1}M", count / 1_000_000.0)
    } else if count >= 1_000.0 {
        format!("{:.1}k", thousands)
    } else {
        format!("{:.0}", count)
    };

    // Trim trailing .0 (e.g., "1.0k" -> "1k")
    formatted.replace(".0M", "M").replace(".0k", "k")
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}

fn format_since(at: DateTime<Utc>) -> String {
    let age = format_age(Utc::now() - at);
    if age == "now" {
        age
    } else {
        format!("{} ago", age)
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, counting chars rather than bytes
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn colored_recommendation(rec: Recommendation, use_colors: bool) -> String {
    if !use_colors {
        return rec.to_string();
    }
    match rec {
        Recommendation::StronglyRecommend | Recommendation::Recommend => rec.green().to_string(),
        Recommendation::Consider | Recommendation::NeedsReview => rec.yellow().to_string(),
        Recommendation::NotRecommended => rec.red().to_string(),
    }
}

/// Format a leaderboard with columns: Index, Score, Brand, Followers, Platform, Name
/// No headers. The brand column is omitted when no entry has a brand match.
pub fn format_leaderboard(entries: &[RankEntry], use_colors: bool) -> String {
    if entries.is_empty() {
        return "No influencers found.".to_string();
    }

    let show_brand = entries.iter().any(|e| e.brand_match.is_some());
    let term_width = get_terminal_width();

    // Index 4, score 6, brand 7, followers 6, platform 10, separators
    let score_width = 6;
    let brand_width = 7;
    let followers_width = 6;
    let platform_width = 10;
    let separator = "  ";
    let fixed_width = 4
        + score_width
        + if show_brand { brand_width + separator.len() } else { 0 }
        + followers_width
        + platform_width
        + separator.len() * 4;

    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let index_str = format!("{:>3}.", idx + 1);
            let score_str = format!(
                "{:>width$}",
                format_score(entry.latest_score),
                width = score_width
            );
            let brand_str = entry
                .brand_match
                .as_ref()
                .map(|m| format!("{:.1}%", m.overall_score))
                .unwrap_or_else(|| "-".to_string());
            let brand_str = format!("{:>width$}", brand_str, width = brand_width);
            let followers_str = format!(
                "{:>width$}",
                format_followers(entry.influencer.followers()),
                width = followers_width
            );
            let platform_str = format!(
                "{:<width$}",
                truncate_name(entry.influencer.platform().name(), platform_width),
                width = platform_width
            );

            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(entry.influencer.name(), width - fixed_width)
                }
                Some(_) => truncate_name(entry.influencer.name(), 20),
                None => entry.influencer.name().to_string(),
            };

            let mut line = if use_colors {
                format!("{} {}", index_str.dimmed(), score_str.bold())
            } else {
                format!("{} {}", index_str, score_str)
            };
            if show_brand {
                line.push_str(separator);
                if use_colors {
                    line.push_str(&brand_str.cyan().to_string());
                } else {
                    line.push_str(&brand_str);
                }
            }
            line.push_str(separator);
            line.push_str(&followers_str);
            line.push_str(separator);
            line.push_str(&platform_str);
            line.push_str(separator);
            if use_colors {
                line.push_str(&name.bold().to_string());
            } else {
                line.push_str(&name);
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tab-separated export for spreadsheets and scripts. One header row, then
/// rank, name, platform, followers, latest score, brand match, recommendation.
pub fn format_tsv(entries: &[RankEntry]) -> String {
    let mut lines = vec![
        "rank\tname\tplatform\tfollowers\tlatest_score\tbrand_match\trecommendation".to_string(),
    ];
    for (idx, entry) in entries.iter().enumerate() {
        let (brand, rec) = match &entry.brand_match {
            Some(m) => (format!("{:.2}", m.overall_score), m.recommendation.to_string()),
            None => (String::new(), String::new()),
        };
        let latest = entry
            .latest_score
            .map(|s| format!("{:.2}", s))
            .unwrap_or_default();
        // Tabs inside names would shift columns
        let name = entry.influencer.name().replace('\t', " ");
        lines.push(format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            idx + 1,
            name,
            entry.influencer.platform(),
            entry.influencer.followers(),
            latest,
            brand,
            rec
        ));
    }
    lines.join("\n")
}

/// Multi-line detail view of one influencer
pub fn format_influencer_detail(influencer: &Influencer, use_colors: bool) -> String {
    let p = &influencer.profile;
    let name = if use_colors {
        p.name.bold().to_string()
    } else {
        p.name.clone()
    };
    let mut out = format!(
        "{}\n  Id: {}\n  Platform: {}\n  Followers: {} ({})\n  Verified: {}\n  Latest score: {}",
        name,
        influencer.id,
        p.platform,
        format_followers(p.follower_count()),
        p.follower_count(),
        if p.verified { "yes" } else { "no" },
        format_score(influencer.latest_score),
    );
    if let Some(ref category) = p.category {
        out.push_str(&format!("\n  Category: {}", category));
    }
    if !p.keywords.is_empty() {
        out.push_str(&format!("\n  Keywords: {}", p.keywords.join(", ")));
    }
    if !p.bio.is_empty() {
        out.push_str(&format!("\n  Bio: {}", truncate_name(&p.bio, 80)));
    }
    out
}

/// Evaluation history, newest first, one line per evaluation
pub fn format_history(evaluations: &[Evaluation], use_colors: bool) -> String {
    if evaluations.is_empty() {
        return "No evaluations yet.".to_string();
    }
    evaluations
        .iter()
        .map(|e| {
            let score = format!("{:>6}", format_score(Some(e.total_score)));
            let score = if use_colors { score.bold().to_string() } else { score };
            let mut line = format!(
                "{}  {:<10}  {:<14}  {}",
                score,
                format_since(e.created_at),
                e.weight_profile,
                e.evaluator
            );
            if !e.notes.is_empty() {
                line.push_str(&format!("  \"{}\"", truncate_name(&e.notes, 60)));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Per-criterion breakdown of a total
pub fn format_breakdown(breakdown: &ScoreBreakdown) -> String {
    let mut lines = vec![format!("Weight profile: {}", breakdown.profile)];
    for c in &breakdown.contributions {
        let clamped_note = if c.clamped != c.raw { " (clamped)" } else { "" };
        lines.push(format!(
            "  {:<18} {:>5.1} x {:.2} = {:>5.2}{}",
            c.criterion.label(),
            c.clamped,
            c.weight,
            c.contribution,
            clamped_note
        ));
    }
    lines.push(format!("  {:<18} {:>22.2}", "Total", breakdown.total));
    lines.join("\n")
}

pub fn format_brand_fit(fit: &BrandFit, use_colors: bool) -> String {
    match fit {
        BrandFit::NotApplicable => fit.summary(),
        BrandFit::Scored(m) => {
            let mut out = format!(
                "Brand match: {:.1}%  {}\n  Popularity: {:+}\n  Verified: {:+}\n  Keywords: {:+}\n  Industry: {:+}",
                m.overall_score,
                colored_recommendation(m.recommendation, use_colors),
                m.popularity,
                m.verified_bonus,
                m.keyword_bonus,
                m.industry_bonus,
            );
            if !m.matched_keywords.is_empty() {
                out.push_str(&format!("\n  Matched: {}", m.matched_keywords.join(", ")));
            }
            out
        }
    }
}

pub fn format_weight_profile(profile: &WeightProfile) -> String {
    let mut lines = vec![format!("{} (sum {:.2})", profile.name, profile.sum())];
    for (criterion, weight) in &profile.weights {
        lines.push(format!("  {:<18} {:.2}", criterion.label(), weight));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::EvaluationScores;
    use crate::influencer::{BrandProfile, InfluencerProfile, KolRecord, Platform};
    use crate::scoring::{compute_brand_match_score, score_breakdown};
    use uuid::Uuid;

    fn sample_influencer(name: &str, followers: i64, latest: Option<f64>) -> Influencer {
        let mut influencer = Influencer::new(
            Uuid::new_v4(),
            InfluencerProfile::new(name, Platform::Instagram, followers),
        );
        influencer.latest_score = latest;
        influencer
    }

    fn entry(name: &str, latest: Option<f64>) -> RankEntry {
        RankEntry::new(KolRecord::Tracked(sample_influencer(name, 52_300, latest)))
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(Some(79.5)), "79.5");
        assert_eq!(format_score(Some(92.0)), "92.0");
        assert_eq!(format_score(Some(79.46)), "79.5");
        assert_eq!(format_score(None), "-");
        assert_eq!(format_score(Some(f64::NAN)), "-");
    }

    #[test]
    fn test_format_followers() {
        assert_eq!(format_followers(0), "0");
        assert_eq!(format_followers(847), "847");
        assert_eq!(format_followers(1_000), "1k");
        assert_eq!(format_followers(1_500), "1.5k");
        assert_eq!(format_followers(50_000), "50k");
        assert_eq!(format_followers(1_000_000), "1M");
        assert_eq!(format_followers(2_300_000), "2.3M");
    }

    #[test]
    fn test_format_followers_unit_after_rounding() {
        assert_eq!(format_followers(999), "999");
        assert_eq!(format_followers(999_949), "999.9k");
        assert_eq!(format_followers(999_950), "1M");
        assert_eq!(format_followers(999_999), "1M");
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(Duration::seconds(30)), "now");
        assert_eq!(format_age(Duration::minutes(30)), "30m");
        assert_eq!(format_age(Duration::hours(3)), "3h");
        assert_eq!(format_age(Duration::days(2)), "2d");
        assert_eq!(format_age(Duration::weeks(2)), "2w");
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Short", 20), "Short");
        assert_eq!(truncate_name("Exact", 5), "Exact");
        assert_eq!(truncate_name("A very long influencer name", 10), "A very ...");
        assert_eq!(truncate_name("美食旅遊日記分享", 6), "美食旅...");
        assert_eq!(truncate_name("Hello", 3), "Hel");
    }

    #[test]
    fn test_format_leaderboard_empty() {
        assert_eq!(format_leaderboard(&[], false), "No influencers found.");
    }

    #[test]
    fn test_format_leaderboard_rows() {
        let entries = vec![entry("Alice", Some(88.25)), entry("Bob", None)];
        let result = format_leaderboard(&entries, false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  1."));
        assert!(lines[0].contains("88.2") || lines[0].contains("88.3"));
        assert!(lines[0].contains("52.3k"));
        assert!(lines[0].contains("Instagram"));
        assert!(lines[0].contains("Alice"));
        assert!(lines[1].starts_with("  2."));
        assert!(lines[1].contains(" -"));
        // No brand column without brand matches
        assert!(!result.contains('%'));
    }

    #[test]
    fn test_format_leaderboard_brand_column() {
        let influencer = sample_influencer("Alice", 50_000, Some(70.0));
        let brand = BrandProfile::default();
        let m = compute_brand_match_score(&influencer.profile, &brand);
        let entries = vec![RankEntry::new(KolRecord::Tracked(influencer)).with_brand_match(Some(m))];
        let result = format_leaderboard(&entries, false);
        assert!(result.contains("67.0%"));
    }

    #[test]
    fn test_format_tsv() {
        let entries = vec![entry("Alice", Some(88.0)), entry("Tab\tName", None)];
        let result = format_tsv(&entries);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("rank\t"));
        assert_eq!(lines[1], "1\tAlice\tInstagram\t52300\t88.00\t\t");
        assert_eq!(lines[2].split('\t').count(), 7);
        assert!(lines[2].contains("Tab Name"));
    }

    #[test]
    fn test_format_history_empty() {
        assert_eq!(format_history(&[], false), "No evaluations yet.");
    }

    #[test]
    fn test_format_history_line() {
        let evaluation = Evaluation {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            influencer_id: Uuid::new_v4(),
            scores: EvaluationScores::uniform(80.0),
            total_score: 79.5,
            weight_profile: "canonical".to_string(),
            notes: "solid".to_string(),
            evaluator: "mei".to_string(),
            created_at: Utc::now() - Duration::days(3),
        };
        let result = format_history(&[evaluation], false);
        assert!(result.contains("79.5"));
        assert!(result.contains("3d ago"));
        assert!(result.contains("canonical"));
        assert!(result.contains("mei"));
        assert!(result.contains("\"solid\""));
    }

    #[test]
    fn test_format_breakdown_marks_clamped() {
        let mut scores = EvaluationScores::uniform(50.0);
        scores.brand_fit = 150.0;
        let breakdown = score_breakdown(&scores, &WeightProfile::canonical());
        let result = format_breakdown(&breakdown);
        assert!(result.starts_with("Weight profile: canonical"));
        assert!(result.contains("Brand fit"));
        assert!(result.contains("(clamped)"));
        assert!(result.contains("Total"));
    }

    #[test]
    fn test_format_brand_fit_not_applicable() {
        assert_eq!(
            format_brand_fit(&BrandFit::NotApplicable, false),
            crate::scoring::NOT_APPLICABLE_MESSAGE
        );
    }

    #[test]
    fn test_format_brand_fit_scored() {
        let mut profile = InfluencerProfile::new("a", Platform::Instagram, 50_000);
        profile.bio = "coffee lover".to_string();
        let brand = BrandProfile {
            keywords: vec!["coffee".to_string()],
            ..BrandProfile::default()
        };
        let fit = BrandFit::Scored(compute_brand_match_score(&profile, &brand));
        let result = format_brand_fit(&fit, false);
        assert!(result.starts_with("Brand match: 72.0%  可以考慮"));
        assert!(result.contains("Matched: coffee"));
    }

    #[test]
    fn test_format_influencer_detail() {
        let mut influencer = sample_influencer("Alice", 1_200_000, Some(64.0));
        influencer.profile.verified = true;
        influencer.profile.category = Some("Food".to_string());
        let result = format_influencer_detail(&influencer, false);
        assert!(result.starts_with("Alice"));
        assert!(result.contains("Followers: 1.2M (1200000)"));
        assert!(result.contains("Verified: yes"));
        assert!(result.contains("Latest score: 64.0"));
        assert!(result.contains("Category: Food"));
    }

    #[test]
    fn test_format_weight_profile() {
        let result = format_weight_profile(&WeightProfile::brand_weighted());
        assert!(result.starts_with("brand-weighted (sum 1.00)"));
        assert_eq!(result.lines().count(), 8);
    }
}
