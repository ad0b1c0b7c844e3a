use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use simlit_core::test_harness::{standard_cast, Cast};
use simlit_core::{ResearchGateway, WorkflowClient};
use simlit_model::{ProgressReportDraft, ProposalDraft, Role, ScoreSheet};
use simlit_workflow::Criterion;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Command::new("simlit")
        .version("0.1.0")
        .about("SIMLIT research-proposal workflow model")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("simulate")
                .about("Drive one proposal through the full lifecycle in memory")
                .arg(
                    Arg::new("verbose-notifications")
                        .long("notifications")
                        .action(ArgAction::SetTrue)
                        .help("Print every notification feed at the end"),
                ),
        )
        .subcommand(
            Command::new("rubric")
                .about("Print the evaluation rubric")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        );

    match cli.get_matches().subcommand() {
        Some(("simulate", args)) => {
            let show_feeds = args.get_flag("verbose-notifications");
            simulate(show_feeds).await
        }
        Some(("rubric", args)) => {
            rubric(args.get_flag("json"));
            Ok(())
        }
        _ => Ok(()),
    }
}

fn rubric(json: bool) {
    if json {
        let rows: Vec<_> = Criterion::ALL
            .iter()
            .map(|c| {
                serde_json::json!({
                    "label": c.label(),
                    "weight": c.weight(),
                })
            })
            .collect();
        println!("{}", serde_json::json!({ "criteria": rows }));
        return;
    }
    println!("Evaluation rubric");
    println!("=================");
    for criterion in Criterion::ALL {
        println!("{:>5}%  {}", criterion.weight(), criterion.label());
    }
}

async fn simulate(show_feeds: bool) -> anyhow::Result<()> {
    let Cast {
        service,
        chief,
        dosen_member,
        student_member,
        reviewer_one,
        reviewer_two,
        faculty_head,
        dean,
        lppm_head,
        ..
    } = standard_cast();
    let client = WorkflowClient::new(Arc::clone(&service));

    println!("Running workflow simulation...");
    println!();

    let draft = ProposalDraft {
        title: "Pemanfaatan Energi Surya untuk Irigasi Desa".into(),
        chief_researcher_id: Some(chief.id),
        dosen_member_ids: vec![dosen_member.id],
        student_member_ids: vec![student_member.id],
        execution_period: chrono::NaiveDate::from_ymd_opt(2026, 9, 1),
        funding_source: "Hibah Internal".into(),
        requested_amount: Some(45_000_000.0),
        research_outcome: "Jurnal nasional terakreditasi".into(),
        ..ProposalDraft::default()
    };

    let mut proposal = client
        .create_proposal(&chief, &draft)
        .await
        .context("create proposal")?;
    println!("created        -> {}", proposal.status);

    for member in [&dosen_member, &student_member] {
        proposal = client
            .respond_membership(member, &proposal, true)
            .await
            .context("membership response")?;
    }
    println!("members agreed -> {}", proposal.status);

    proposal = client
        .assign_reviewers(
            &faculty_head,
            &proposal,
            &[reviewer_one.clone(), reviewer_two.clone()],
        )
        .await
        .context("assign reviewers")?;
    println!("panel assigned -> {}", proposal.status);

    for reviewer in [&reviewer_one, &reviewer_two] {
        proposal = client
            .respond_review(reviewer, &proposal, true)
            .await
            .context("reviewer response")?;
    }
    println!("panel accepted -> {}", proposal.status);

    proposal = client
        .submit_evaluation(&reviewer_one, &proposal, &ScoreSheet::uniform(85.0), None)
        .await
        .context("first evaluation")?;
    proposal = client
        .submit_evaluation(
            &reviewer_two,
            &proposal,
            &ScoreSheet::uniform(70.0),
            Some("Metodologi perlu dipertajam"),
        )
        .await
        .context("second evaluation")?;
    let average = simlit_workflow::average_total(&proposal.evaluations);
    println!(
        "review done    -> {} (average score {})",
        proposal.status,
        average.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
    );

    proposal = client
        .approve_as_faculty_head(&faculty_head, &proposal)
        .await
        .context("faculty head approval")?;
    println!("faculty head   -> {}", proposal.status);

    proposal = client
        .approve_as_dean(&dean, &proposal)
        .await
        .context("dean approval")?;
    println!("dean           -> {}", proposal.status);

    proposal = client
        .approve_as_lppm(&lppm_head, &proposal)
        .await
        .context("lppm approval")?;
    println!("lppm           -> {}", proposal.status);

    let report = ProgressReportDraft {
        report_year: chrono::NaiveDate::from_ymd_opt(2027, 1, 1),
        current_year_budget: Some(20_000_000.0),
        cumulative_budget: Some(45_000_000.0),
        report_file: Some("/files/laporan-kemajuan-1.pdf".into()),
    };
    proposal = client
        .submit_progress_report(&chief, &proposal, &report)
        .await
        .context("progress report")?;
    for (approver, role) in [
        (&faculty_head, Role::KetuaPenelitianFakultas),
        (&dean, Role::Dekan),
        (&lppm_head, Role::KetuaLppm),
    ] {
        proposal = client
            .approve_progress(approver, &proposal, role)
            .await
            .context("progress approval")?;
    }
    proposal = client
        .upload_monitoring_decree(&lppm_head, &proposal, "/files/sk-pemantauan-1.pdf")
        .await
        .context("monitoring decree")?;
    let flow_status = proposal
        .report_flow
        .as_ref()
        .and_then(|f| f.status)
        .map_or_else(|| "-".to_string(), |s| s.to_string());
    println!("monitoring     -> {} (report {})", proposal.status, flow_status);

    if show_feeds {
        println!();
        println!("Notification feeds");
        println!("==================");
        for user in [
            &chief,
            &dosen_member,
            &student_member,
            &reviewer_one,
            &reviewer_two,
            &faculty_head,
            &dean,
            &lppm_head,
        ] {
            let feed = service
                .fetch_notifications(user.id)
                .await
                .context("fetch notifications")?;
            println!("{} ({} unread):", user.display_name(), feed.iter().filter(|n| !n.read).count());
            for n in feed {
                println!("  - {}", n.message);
            }
        }
    }

    println!();
    println!("Simulation complete.");
    Ok(())
}
