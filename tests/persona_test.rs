mod helpers;

use mcp_instruct::onboarding::{self, QuickSetup};

const IT_EXPERT: &str = "# IT Expert\n\n## Role\nSenior IT Professional.\n\n## Core Expertise\n- Networking\n- Linux\n- Cloud\n- Backups\n- Monitoring\n- Scripting\n";
const RED_TEAM: &str = "# Red Team Operator\n\n## Role\nAdversary emulation.\n\n## Core Expertise\n- Phishing\n";

#[test]
fn templates_load_from_directory() {
    let (_dir, agents) = helpers::test_agents(&[("it-expert", IT_EXPERT), ("red-team", RED_TEAM)]);

    assert_eq!(agents.templates().count(), 2);
    let it = agents.template("it-expert").unwrap();
    assert_eq!(it.name, "It Expert");
    assert_eq!(it.metadata.category.as_deref(), Some("Technology"));

    let context = agents.context("it-expert").unwrap();
    assert_eq!(context.expertise.len(), 5);
    assert!(!context.active);

    assert_eq!(agents.by_category("Cybersecurity - Offensive").count(), 1);
}

#[test]
fn reload_drops_stale_active_selection() {
    let (dir, mut agents) = helpers::test_agents(&[("it-expert", IT_EXPERT), ("red-team", RED_TEAM)]);
    assert!(agents.quick_switch("red"));

    std::fs::remove_file(dir.path().join("red-team.md")).unwrap();
    assert_eq!(agents.reload().unwrap(), 1);
    assert!(agents.active().is_none());
}

#[test]
fn onboarding_quick_setup_end_to_end() {
    let (_tmp, mut store) = helpers::test_store();
    let (_dir, mut agents) = helpers::test_agents(&[("it-expert", IT_EXPERT)]);

    let status = onboarding::status(&store, &agents);
    assert!(status.is_new);
    assert!(status.active_agent.is_none());

    let setup = QuickSetup {
        name: Some("Sam".into()),
        role: Some("IT administrator".into()),
        preferred_agent: None,
    };
    let message = onboarding::quick_setup(&mut store, &mut agents, &setup).unwrap();
    assert!(message.contains("Profile: Sam - IT administrator"));

    let status = onboarding::status(&store, &agents);
    assert!(!status.is_new);
    assert_eq!(status.active_agent.as_deref(), Some("It Expert"));
    assert_eq!(store.personal().name.as_deref(), Some("Sam"));
    assert_eq!(store.professional().occupation.as_deref(), Some("IT administrator"));
    assert!(onboarding::welcome(&store, &agents).starts_with("Welcome back, Sam!"));
}
