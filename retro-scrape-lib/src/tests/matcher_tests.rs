use super::*;

fn candidates(titles: &[&str]) -> Vec<Candidate> {
    titles
        .iter()
        .enumerate()
        .map(|(i, t)| Candidate::new(*t, i.to_string()))
        .collect()
}

#[test]
fn normalize_strips_notes_and_underscores() {
    assert_eq!(normalize("Super_Mario_World_(USA)"), "Super Mario World");
    assert_eq!(normalize("Axelay (USA) [!]"), "Axelay");
    assert_eq!(normalize("  Contra   III  "), "Contra III");
}

#[test]
fn normalize_moves_trailing_article() {
    assert_eq!(
        normalize("Legend of Zelda, The (USA) [!]"),
        "The Legend of Zelda"
    );
    assert_eq!(normalize("Lost Vikings, the"), "The Lost Vikings");
    assert_eq!(normalize("Theme Park"), "Theme Park");
}

#[test]
fn normalize_handles_nested_and_unbalanced_brackets() {
    assert_eq!(normalize("Game (Rev (A)) Extra"), "Game Extra");
    assert_eq!(normalize("Game) Two"), "Game Two");
}

#[test]
fn bracket_notes_keep_order() {
    assert_eq!(bracket_notes("Super Metroid (Japan, USA) [!]"), "(Japan, USA) [!]");
    assert_eq!(bracket_notes("Plain Name"), "");
}

#[test]
fn display_title_appends_notes_only_when_asked() {
    assert_eq!(
        display_title("Super Metroid", "Super Metroid (USA) [!]", true),
        "Super Metroid (USA) [!]"
    );
    assert_eq!(
        display_title("Super Metroid", "Super Metroid (USA) [!]", false),
        "Super Metroid"
    );
    assert_eq!(display_title("Tetris", "Tetris", true), "Tetris");
}

#[test]
fn score_ignores_case_and_punctuation() {
    assert_eq!(score("Super Metroid", "super metroid!"), 100);
    assert!(score("Street Fighter II", "Street Fighter II: The World Warrior") < 65);
    assert_eq!(score("", "anything"), 0);
    assert_eq!(score("!!!", "???"), 0);
}

#[test]
fn select_prefers_highest_score() {
    let list = candidates(&["Super Mario Kart", "Super Metroid", "Metroid Fusion"]);
    let selection = select("Super Metroid", &list, Platform::Snes, 65);
    assert_eq!(selection.index, Some(1));
    assert_eq!(selection.score, 100);
    assert_eq!(selection.closest.as_deref(), Some("Super Metroid"));
}

#[test]
fn select_breaks_ties_towards_first() {
    let list = candidates(&["Tetris", "Tetris"]);
    assert_eq!(select("Tetris", &list, Platform::GameBoy, 65).index, Some(0));
}

#[test]
fn select_below_threshold_still_reports_closest() {
    let list = candidates(&["Metroid"]);
    let selection = select("Zelda", &list, Platform::Nes, 65);
    assert_eq!(selection.index, None);
    assert!(selection.score < 65);
    assert_eq!(selection.closest.as_deref(), Some("Metroid"));
}

#[test]
fn zero_score_reports_no_closest_title() {
    let mut other = Candidate::new("Sonic the Hedgehog", "1");
    other.platform = Some("Sega Genesis".to_string());

    let selection = select("Axelay", &[other], Platform::Snes, 65);
    assert_eq!(selection.index, None);
    assert_eq!(selection.score, 0);
    assert_eq!(selection.closest, None);
    assert_eq!(
        crate::miss_log::line("Axelay", selection.closest.as_deref()),
        "'Axelay', No returned matches"
    );
}

#[test]
fn select_on_empty_list_is_empty() {
    assert_eq!(select("Anything", &[], Platform::Nes, 0), Selection::default());
}

#[test]
fn wrong_platform_scores_zero() {
    let mut wrong = Candidate::new("Sonic the Hedgehog", "1");
    wrong.platform = Some("Sega Master System".to_string());
    let mut right = Candidate::new("Sonic the Hedgehog", "2");
    right.platform = Some("Sega Genesis".to_string());

    let selection = select("Sonic the Hedgehog", &[wrong, right], Platform::Genesis, 65);
    assert_eq!(selection.index, Some(1));
}

#[test]
fn alternative_titles_count() {
    let mut candidate = Candidate::new("Street Fighter II: The World Warrior", "sf2");
    candidate.alt_titles = vec!["sf2".to_string()];
    let selection = select("sf2", &[candidate], Platform::Arcade, 65);
    assert_eq!(selection.index, Some(0));
    assert_eq!(selection.score, 100);
}
