// src/chat/prompt.rs
use crate::domain::event::PlanningEvent;
use crate::domain::overview::HEADLINE_CHARS;

/// Numbered context blocks, one per retrieved event.
pub fn context_block(ctx: &[&PlanningEvent]) -> String {
    ctx.iter()
        .enumerate()
        .map(|(i, e)| {
            format!(
                "[{n}] REF={r} TYPE={t} DECISION={d}\nHEADING: {h}\nPROPOSAL: {p}\nURL: {u}\n",
                n = i + 1,
                r = e.reference,
                t = e.application_type,
                d = e.decision,
                h = e.heading,
                p = e.proposal_text,
                u = e.url,
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_prompt(question: &str, ctx: &[&PlanningEvent]) -> String {
    format!(
        "Answer ONLY using the context.\nCite facts with [1], [2]...\nIf context is insufficient, say so.\n\nQUESTION:\n{question}\n\nCONTEXT:\n{}",
        context_block(ctx)
    )
    .trim()
    .to_string()
}

/// Answer used when no model is configured: the retrieved commits as bullets.
pub fn fallback_answer(ctx: &[&PlanningEvent]) -> String {
    let bullets: Vec<String> = ctx
        .iter()
        .map(|e| {
            format!(
                "- {} ({}, {}): {}",
                e.reference,
                e.application_type,
                e.decision,
                e.headline(HEADLINE_CHARS)
            )
        })
        .collect();
    format!(
        "Gemini not configured. Here are the most relevant commits:\n{}",
        bullets.join("\n")
    )
}
