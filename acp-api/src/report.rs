//! Human-readable ACR summaries
//!
//! Renders an ACR's reference sets, its resource-scoped objects and the
//! per-actor access a snapshot resolves to. Pure string building for
//! debugging and audit output; no I/O.

use acp_policy::{
    get_actor_access_all, ActorRelation, AcpSnapshot, ModeSet, Policy, ResourceWithAcr,
};
use std::fmt::Write as _;

fn mode_list(modes: &ModeSet) -> String {
    let mut names = Vec::new();
    if modes.read {
        names.push("read");
    }
    if modes.append {
        names.push("append");
    }
    if modes.write {
        names.push("write");
    }
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

fn write_policy(out: &mut String, policy: &Policy) {
    let _ = writeln!(out, "- {}", policy.url());
    let _ = writeln!(out, "  - allow: {}", mode_list(policy.allow()));
    let _ = writeln!(out, "  - deny: {}", mode_list(policy.deny()));
    for (label, set) in [
        ("allOf", policy.all_of()),
        ("anyOf", policy.any_of()),
        ("noneOf", policy.none_of()),
    ] {
        if !set.is_empty() {
            let urls: Vec<&str> = set.iter().map(|u| u.as_str()).collect();
            let _ = writeln!(out, "  - {}: {}", label, urls.join(", "));
        }
    }
}

/// Render a resource's ACR and the access its snapshot resolves to
pub fn acr_report(resource: &ResourceWithAcr, snapshot: &AcpSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Access Control Resource for {}", resource.url());

    let Some(acr) = resource.acr() else {
        let _ = writeln!(out, "\nNo accessible ACR is attached.");
        return out;
    };

    let _ = writeln!(out, "\n## Policy references");
    for (label, urls) in [
        ("resource", acr.policy_urls()),
        ("member", acr.member_policy_urls()),
        ("acr", acr.acr_policy_urls()),
        ("member acr", acr.member_acr_policy_urls()),
    ] {
        let _ = writeln!(out, "- {}: {}", label, urls.len());
        for url in urls {
            let _ = writeln!(out, "  - {}", url);
        }
    }

    let scoped = acr.scoped_policies();
    if !scoped.is_empty() {
        let _ = writeln!(out, "\n## Resource-scoped policies");
        for policy in &scoped {
            write_policy(&mut out, policy);
        }
    }

    if snapshot.is_indeterminate() {
        let _ = writeln!(out, "\n## Access");
        let _ = writeln!(
            out,
            "Indeterminate: {} policy resource(s) could not be fetched.",
            snapshot.inaccessible_urls.len()
        );
        for url in &snapshot.inaccessible_urls {
            let _ = writeln!(out, "- {}", url);
        }
        return out;
    }

    if let Some(agents) = get_actor_access_all(snapshot, ActorRelation::Agent) {
        let _ = writeln!(out, "\n## Agent access");
        if agents.is_empty() {
            let _ = writeln!(out, "No agents are explicitly named.");
        }
        for (agent, access) in agents {
            let _ = writeln!(
                out,
                "- {}: read={} append={} write={} controlRead={} controlWrite={}",
                agent,
                access.read,
                access.append,
                access.write,
                access.control_read,
                access.control_write
            );
        }
    }

    out
}
