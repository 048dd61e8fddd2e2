//! Decide and pr commands - evaluate without writing

use crate::cli::context::CommandContext;
use crate::cli::style::{CHECK, Stylize, arrow};
use anstream::println;
use mergerine::decide::{Action, Decision, decide, decide_for_pull};
use mergerine::error::Result;

/// Run one decision cycle and print the outcome
pub async fn run_decide(ctx: &CommandContext) -> Result<()> {
    let options = ctx.config.decide_options();
    let decision = decide(&options, ctx.platform.as_ref()).await?;
    print_decision(&decision);
    Ok(())
}

/// Evaluate a single PR and print the outcome
pub async fn run_pr(ctx: &CommandContext, pr_number: u64) -> Result<()> {
    let options = ctx.config.decide_options();
    let pull = ctx.platform.get_pull(pr_number).await?;
    let decision = decide_for_pull(pull, &options, ctx.platform.as_ref()).await?;
    print_decision(&decision);
    Ok(())
}

fn print_decision(decision: &Decision) {
    if decision.results.is_empty() {
        println!("{}", "No candidate PRs".muted());
    } else {
        println!("{}:", "Candidates".emphasis());
        for pull in &decision.results {
            println!(
                "  {} #{} {} {}",
                arrow(),
                pull.number,
                pull.title,
                format!("({}, {})", pull.state, pull.mergeable_state).muted()
            );
        }
        println!();
    }

    match (&decision.action, &decision.result) {
        (Action::Wait, _) | (_, None) => println!("{}", "Decision: wait".warn()),
        (action, Some(pull)) => println!(
            "{} {} #{} {}",
            format!("{CHECK} Decision:").success(),
            action.accent(),
            pull.number,
            pull.html_url.muted()
        ),
    }
}
