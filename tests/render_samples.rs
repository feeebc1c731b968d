//! Rendering tests: build small compositions and render them to SVG.

use composerlib::{
    render_events_to_svg, render_rows_to_svg, Accidental, Composer, ComposerConfig, Duration, ManualFrameClock,
    MemoryStorage, MusicalEvent, NewEvent, NoteName, StaffMetrics,
};
use std::path::PathBuf;

fn output_dir() -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_output");
    std::fs::create_dir_all(&dir).ok();
    dir
}

fn sample_session() -> Composer<MemoryStorage, ManualFrameClock> {
    let mut composer = Composer::new(ComposerConfig::default(), MemoryStorage::new(), ManualFrameClock::new());
    composer.add_event(NewEvent::chord(NoteName::C, Duration::Whole));
    composer.add_event(NewEvent::note(NoteName::C, Duration::Quarter));
    composer.add_event(NewEvent::Note {
        note: Some(NoteName::F),
        octave: 4,
        duration: Duration::Eighth,
        accidental: Accidental::Sharp,
        is_rest: false,
    });
    composer.add_event(NewEvent::rest(Duration::Half));
    composer.add_event(NewEvent::note(NoteName::A, Duration::Whole));
    composer.add_event(NewEvent::Note {
        note: Some(NoteName::C),
        octave: 6,
        duration: Duration::Half,
        accidental: Accidental::Flat,
        is_rest: false,
    });
    composer
}

#[test]
fn render_sample_composition() {
    let composer = sample_session();
    let svg = composer.render_svg();

    assert!(svg.starts_with("<svg"), "Output should be SVG");
    assert!(svg.contains("</svg>"), "SVG should be closed");

    // five staff lines, plus ledger lines for C4 and C6
    assert!(svg.matches("<line").count() >= 5 + 1 + 3, "SVG should contain staff and ledger lines");

    // note heads: four pitched notes
    assert_eq!(svg.matches("<ellipse").count(), 4, "SVG should contain a head per pitched note");

    assert!(svg.contains('♯'), "SVG should contain the sharp");
    assert!(svg.contains('♭'), "SVG should contain the flat");
    assert!(svg.contains("𝄼"), "SVG should contain the half rest");
    assert!(svg.contains(">C</text>"), "SVG should contain the chord symbol");
    assert!(svg.contains("<path"), "SVG should contain the eighth flag");
    assert!(!svg.contains("#d9480f"), "Nothing should be highlighted while stopped");

    // every drawn head and chord symbol is tagged for hit-testing
    let tagged = composer
        .events()
        .iter()
        .filter(|e| !matches!(e, MusicalEvent::Note(n) if n.is_rest));
    for event in tagged {
        assert!(svg.contains(&format!("data-id=\"{}\"", event.id())), "missing {}", event.id());
    }

    let out_path = output_dir().join("sample_composition.svg");
    std::fs::write(&out_path, &svg).expect("Failed to write SVG");
    println!("Wrote {} bytes to {}", svg.len(), out_path.display());
}

#[test]
fn render_highlights_the_sounding_event() {
    let mut composer = sample_session();
    composer.play(0.0).unwrap();
    composer.clock_mut().fire();
    // 120 BPM: 0.75 s puts the cursor at 1.5, slot 1 (the C4 quarter)
    composer.tick(750.0);

    let svg = composer.render_svg();
    let highlighted: Vec<&str> = svg.lines().filter(|l| l.contains("#d9480f")).collect();
    assert_eq!(highlighted.len(), 2, "head and stem of the active note: {highlighted:?}");
    let active_id = composer.events()[1].id();
    assert!(highlighted.iter().any(|l| l.contains(active_id)));
}

#[test]
fn render_wraps_rows() {
    let metrics = StaffMetrics::default();
    let events: Vec<String> = (0..30)
        .map(|i| {
            format!(
                r#"{{"id":"n{i}","note":"{}","accidental":"","octave":4,"duration":"quarter","position":{i},"isRest":false}}"#,
                NoteName::ALL[i % 7].as_str()
            )
        })
        .collect();
    let json = format!("[{}]", events.join(","));

    let svg = render_events_to_svg(&json, 400.0, &metrics).expect("Failed to render");
    // (400 - 120) / 40 = 7 per row
    assert_eq!(svg.matches("<g class=\"row").count(), 5);
    assert_eq!(svg.matches("<g class=\"row insert\"").count(), 1);
    assert_eq!(svg.matches("<ellipse").count(), 30);
}

#[test]
fn render_nothing() {
    let svg = render_rows_to_svg(&[], &StaffMetrics::default());
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Nothing to display"));
}
