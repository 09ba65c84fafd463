use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::models::{BandCount, ClassSummary, GradeBand, RankTier, Roster, Student};
use crate::ranking::top_percent;

/// Students shown on the leaderboard and the top-students chart.
pub const LEADERBOARD_SIZE: usize = 10;

pub fn grade_distribution(roster: &Roster) -> Vec<BandCount> {
    let mut counts = vec![0usize; GradeBand::ALL.len()];
    for student in roster.students() {
        let band = GradeBand::for_average(student.average_grade);
        if let Some(slot) = GradeBand::ALL.iter().position(|b| *b == band) {
            counts[slot] += 1;
        }
    }

    GradeBand::ALL
        .iter()
        .zip(counts)
        .map(|(band, count)| BandCount { band: *band, count })
        .collect()
}

pub fn summarize(roster: &Roster) -> ClassSummary {
    let student_count = roster.len();
    let class_average = if student_count == 0 {
        0.0
    } else {
        roster.students().iter().map(|s| s.average_grade).sum::<f64>() / student_count as f64
    };
    let top_average = roster
        .students()
        .first()
        .map(|s| s.average_grade)
        .unwrap_or(0.0);

    ClassSummary {
        student_count,
        class_average,
        top_average,
        distribution: grade_distribution(roster),
    }
}

/// Short relative label such as "just now", "5m ago", "2h ago" or "3d ago".
pub fn recency_label(at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(at) = at else {
        return "never".to_string();
    };
    let minutes = (now - at).num_minutes();
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / 1440)
    }
}

fn movement(student: &Student) -> String {
    match student.rank_change() {
        0 => "-".to_string(),
        change if change > 0 => format!("up {}", change),
        change => format!("down {}", -change),
    }
}

fn tier_marker(rank: u32) -> &'static str {
    match RankTier::for_rank(rank) {
        RankTier::Podium => "*",
        RankTier::TopTen => "+",
        RankTier::Field => " ",
    }
}

pub fn leaderboard_line(student: &Student, class_size: usize, now: DateTime<Utc>) -> String {
    format!(
        "{}#{} {} ({}) avg {:.1}% total {} across {} assignments [{}] top {}% of class, last submission {}",
        tier_marker(student.rank),
        student.rank,
        student.name,
        student.email,
        student.average_grade,
        student.total_score,
        student.assignments,
        movement(student),
        top_percent(student.rank, class_size),
        recency_label(student.last_submission, now),
    )
}

pub fn build_report(roster: &Roster, now: DateTime<Utc>) -> String {
    let summary = summarize(roster);
    let mut output = String::new();

    let _ = writeln!(output, "# Classroom Leaderboard Report");
    let _ = writeln!(output, "Generated {}", now.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Class Summary");
    let _ = writeln!(output, "- Total students: {}", summary.student_count);
    let _ = writeln!(output, "- Class average: {:.1}%", summary.class_average);
    let _ = writeln!(output, "- Top score: {:.1}%", summary.top_average);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Grade Distribution");
    for entry in &summary.distribution {
        let _ = writeln!(output, "- {}%: {} students", entry.band.label(), entry.count);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Leaderboard");
    if roster.is_empty() {
        let _ = writeln!(output, "No students enrolled.");
    } else {
        for student in roster.students().iter().take(LEADERBOARD_SIZE) {
            let _ = writeln!(output, "- {}", leaderboard_line(student, roster.len(), now));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::seed;

    #[test]
    fn distribution_counts_every_student_once() {
        let roster = seed::default_roster();
        let counts: Vec<(&str, usize)> = grade_distribution(&roster)
            .iter()
            .map(|entry| (entry.band.label(), entry.count))
            .collect();
        assert_eq!(
            counts,
            vec![("90-100", 2), ("80-89", 4), ("70-79", 2), ("60-69", 0), ("0-59", 0)]
        );
    }

    #[test]
    fn summary_of_seed_class() {
        let summary = summarize(&seed::default_roster());
        assert_eq!(summary.student_count, 8);
        assert!((summary.class_average - 84.5).abs() < 1e-9);
        assert_eq!(summary.top_average, 95.0);
    }

    #[test]
    fn empty_class_summarizes_to_zero() {
        let summary = summarize(&Roster::default());
        assert_eq!(summary.class_average, 0.0);
        assert_eq!(summary.top_average, 0.0);
        assert!(summary.distribution.iter().all(|entry| entry.count == 0));
        assert!(build_report(&Roster::default(), Utc::now()).contains("No students enrolled."));
    }

    #[test]
    fn recency_labels_scale_with_age() {
        let now = Utc::now();
        assert_eq!(recency_label(None, now), "never");
        assert_eq!(recency_label(Some(now), now), "just now");
        assert_eq!(recency_label(Some(now - Duration::minutes(5)), now), "5m ago");
        assert_eq!(recency_label(Some(now - Duration::hours(2)), now), "2h ago");
        assert_eq!(recency_label(Some(now - Duration::days(3)), now), "3d ago");
    }

    #[test]
    fn report_lists_leaders_with_movement() {
        let now = Utc::now();
        let report = build_report(&seed::default_roster_at(now), now);
        assert!(report.contains("- Class average: 84.5%"));
        assert!(report.contains("- 80-89%: 4 students"));
        assert!(report.contains("*#1 Emma Johnson (emma.johnson@school.edu) avg 95.0%"));
        assert!(report.contains("[up 1] top 100% of class, last submission 2h ago"));
        assert!(report.contains("#2 Liam Chen"));
        assert!(report.contains("[down 1]"));
    }
}
