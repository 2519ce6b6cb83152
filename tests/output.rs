use mytasks::output::{format_human, HumanOutput};

#[test]
fn format_human_includes_sections() {
    let mut human = HumanOutput::new("mytasks list new: Alice");
    human.push_summary("id", "0f3c9a2e");
    human.push_detail("created task_lists.json");
    human.push_warning("2 task(s) are now unassigned");
    human.push_next_step("mytasks overview");

    let rendered = format_human(&human);
    assert!(rendered.contains("mytasks list new: Alice"));
    assert!(rendered.contains("Summary:"));
    assert!(rendered.contains("- id: 0f3c9a2e"));
    assert!(rendered.contains("Details:"));
    assert!(rendered.contains("- created task_lists.json"));
    assert!(rendered.contains("Warnings:"));
    assert!(rendered.contains("- 2 task(s) are now unassigned"));
    assert!(rendered.contains("Next steps:"));
    assert!(rendered.contains("- mytasks overview"));
}

#[test]
fn format_human_omits_empty_sections() {
    let human = HumanOutput::new("mytasks lists (0)");
    let rendered = format_human(&human);
    assert_eq!(rendered, "mytasks lists (0)");
}
