use crate::infra::{in_memory_service, InMemoryReputationService};
use clap::Args;
use ratedin::error::AppError;
use ratedin::reputation::{
    radar_breakdown, weight_for, weighted_average, AssessmentCsvImporter, AssessmentSubmission,
    CompetencyScores, Evaluator, EvaluatorId, NewProfile, Profile, ProfileReport, RadarPoint,
    RawCompetencyScores, ScoreBand, SeniorityTier, DEFAULT_LEADERBOARD_LIMIT,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// CSV export with six score columns and weight_applied
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Restrict the radar breakdown to Senior, Staff, and Lead assessments
    #[arg(long)]
    pub(crate) senior_only: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs { csv, senior_only } = args;
    let rows = AssessmentCsvImporter::from_path(&csv)?;

    let overall = weighted_average(&rows);
    println!("Assessments scored from {}", csv.display());
    println!(
        "- {} assessments | overall {:.2} / 5 ({})",
        rows.len(),
        overall,
        ScoreBand::from_score(overall).label()
    );
    render_radar(&radar_breakdown(&rows, senior_only), senior_only);
    Ok(())
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    println!("Ratedin reputation demo");
    let service = in_memory_service(DEFAULT_LEADERBOARD_LIMIT);

    let profile = match service.register_profile(NewProfile {
        full_name: "Grace Hopper".to_string(),
        linkedin_url: "grace-hopper".to_string(),
        avatar_url: None,
    }) {
        Ok(profile) => profile,
        Err(err) => {
            println!("  Profile registration failed: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Registered {} ({}) as {}",
        profile.full_name,
        profile.initials(),
        profile.linkedin_url
    );

    println!("\nSubmissions");
    for (index, (tier, scores)) in demo_panel().into_iter().enumerate() {
        let evaluator = demo_evaluator(index, tier);
        submit_and_print(&service, &evaluator, &profile, scores.into());
    }

    let repeat = demo_evaluator(0, SeniorityTier::Junior);
    submit_and_print(
        &service,
        &repeat,
        &profile,
        CompetencyScores::uniform(5).into(),
    );

    let mut out_of_range = RawCompetencyScores::from(CompetencyScores::uniform(4));
    out_of_range.pragmatism = Some(7);
    let newcomer = Evaluator {
        id: EvaluatorId("eval-newcomer".to_string()),
        seniority: SeniorityTier::Mid,
    };
    submit_and_print(&service, &newcomer, &profile, out_of_range);

    for senior_only in [false, true] {
        match service.report(&profile.id, Some(&repeat.id), senior_only) {
            Ok(report) => render_report(&report),
            Err(err) => println!("  Report unavailable: {}", err),
        }
    }

    match service.leaderboard(None) {
        Ok(entries) => {
            println!("\nLeaderboard");
            for (rank, entry) in entries.iter().enumerate() {
                println!(
                    "  {}. {} (@{}) {:.2} from {} assessments",
                    rank + 1,
                    entry.full_name,
                    entry.handle(),
                    entry.average_score,
                    entry.total_assessments
                );
            }
        }
        Err(err) => println!("  Leaderboard unavailable: {}", err),
    }

    Ok(())
}

fn demo_panel() -> Vec<(SeniorityTier, CompetencyScores)> {
    vec![
        (SeniorityTier::Junior, CompetencyScores::uniform(3)),
        (
            SeniorityTier::Mid,
            CompetencyScores {
                communication: 4,
                resilience: 3,
                collaboration: 4,
                ownership: 3,
                commitment: 4,
                pragmatism: 3,
            },
        ),
        (
            SeniorityTier::Senior,
            CompetencyScores {
                communication: 5,
                resilience: 4,
                collaboration: 5,
                ownership: 4,
                commitment: 5,
                pragmatism: 4,
            },
        ),
        (SeniorityTier::Staff, CompetencyScores::uniform(4)),
        (
            SeniorityTier::Lead,
            CompetencyScores {
                communication: 5,
                resilience: 5,
                collaboration: 4,
                ownership: 5,
                commitment: 5,
                pragmatism: 5,
            },
        ),
    ]
}

fn demo_evaluator(index: usize, seniority: SeniorityTier) -> Evaluator {
    Evaluator {
        id: EvaluatorId(format!("eval-{}-{}", index + 1, seniority.label().to_lowercase())),
        seniority,
    }
}

fn submit_and_print(
    service: &InMemoryReputationService,
    evaluator: &Evaluator,
    profile: &Profile,
    scores: RawCompetencyScores,
) {
    let submission = AssessmentSubmission {
        target_profile_id: profile.id.clone(),
        scores,
    };
    match service.submit(evaluator, submission) {
        Ok(assessment) => println!(
            "- {} [{}] accepted with weight {:.1}",
            evaluator.id, evaluator.seniority, assessment.weight_applied
        ),
        Err(err) => println!(
            "- {} [{}, weight {:.1}] rejected: {}",
            evaluator.id,
            evaluator.seniority,
            weight_for(evaluator.seniority),
            err
        ),
    }
}

fn render_report(report: &ProfileReport) {
    println!(
        "\nReport for {} (@{})",
        report.profile.full_name, report.profile.handle
    );
    println!(
        "- overall {:.2} / 5 ({}) from {} assessments",
        report.overall_score,
        report.score_band.label(),
        report.assessment_count
    );
    if let Some(has_assessed) = report.has_assessed {
        println!("- viewer already assessed: {}", has_assessed);
    }
    render_radar(&report.radar, report.senior_only);
}

fn render_radar(points: &[RadarPoint], senior_only: bool) {
    let scope = if senior_only {
        "senior evaluators"
    } else {
        "all evaluators"
    };
    println!("Radar ({})", scope);
    for point in points {
        println!(
            "  - {:<24} {:.2} / {}",
            point.label, point.value, point.scale_max
        );
    }
}
