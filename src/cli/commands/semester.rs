//! Semester command handler

use super::{load_gradebook, open_store, read_optional_input, report_failure, to_index};
use crate::args::SemesterSubcommand;
use gradeplan::config::Config;
use gradeplan::core::models::{Semester, TermTag, DEFAULT_SEMESTER_NAME};
use gradeplan::core::organizer::SemesterSection;
use gradeplan::core::store::Gradebook;
use gradeplan::{info, verbose};
use std::fmt::Write;

/// Dispatch semester subcommands
pub fn run(subcommand: SemesterSubcommand, config: &Config) {
    let result = match subcommand {
        SemesterSubcommand::Add { name, from } => add(name.as_deref(), from.as_deref(), config),
        SemesterSubcommand::List => list(config),
        SemesterSubcommand::Remove { semester } => remove(&semester, config),
        SemesterSubcommand::Rename {
            semester,
            name,
            retag,
        } => rename(&semester, &name, retag, config),
        SemesterSubcommand::Move { from, to } => move_semester(from, to, config),
        SemesterSubcommand::Term {
            semester,
            term,
            clear,
        } => set_term(&semester, term.as_deref(), clear, config),
    };
    if let Err(err) = result {
        report_failure("Semester command", &err);
    }
}

fn add(name: Option<&str>, from: Option<&std::path::Path>, config: &Config) -> Result<(), String> {
    let text = read_optional_input(from)?;
    let parser = config.course_parser();
    let store = open_store(config);
    let name = name.unwrap_or(DEFAULT_SEMESTER_NAME);

    let message = store
        .update(|gradebook| {
            gradebook
                .add_semester(name, &text, &parser)
                .map(added_message)
        })
        .map_err(|e| format!("✗ {e}"))?;

    println!("{message}");
    Ok(())
}

/// Confirmation line naming the semester as stored (trimmed or defaulted)
fn added_message(semester: &Semester) -> String {
    format!(
        "✓ Added semester '{}' ({} course(s), id {})",
        semester.name,
        semester.courses.len(),
        semester.id
    )
}

fn list(config: &Config) -> Result<(), String> {
    let store = open_store(config);
    let gradebook = load_gradebook(&store)?;
    if gradebook.is_empty() {
        println!("No semesters yet. Add one with `gradeplan semester add`.");
        return Ok(());
    }

    let sections = gradebook.sections(&config.organizer());
    print!("{}", render_sections(&gradebook, &sections));
    verbose!("Data file: {}", store.path().display());
    Ok(())
}

/// Organized listing; positions refer to the stored order
pub fn render_sections(gradebook: &Gradebook, sections: &[SemesterSection<'_>]) -> String {
    let mut out = String::new();
    for section in sections {
        let _ = writeln!(out, "\n== {} ==", section.label);
        for semester in &section.semesters {
            let position = gradebook
                .semesters()
                .iter()
                .position(|s| s.id == semester.id)
                .map_or(0, |idx| idx + 1);
            let _ = writeln!(out, "  [{position}] {}", describe(semester));
        }
    }
    let overall = gradebook.overall();
    let _ = writeln!(
        out,
        "\nOverall: {:.2} credits, GPA {:.2}",
        overall.total_credits, overall.gpa
    );
    out
}

fn describe(semester: &Semester) -> String {
    let term = semester
        .term
        .map_or_else(String::new, |tag| format!(" <{tag}>"));
    format!(
        "{}{term}: {} course(s), {:.2} credits, GPA {:.2} (id {})",
        semester.name,
        semester.courses.len(),
        semester.total_credits,
        semester.gpa,
        semester.id
    )
}

fn remove(selector: &str, config: &Config) -> Result<(), String> {
    let store = open_store(config);
    let removed = store
        .update(|gradebook| {
            let id = gradebook.resolve_id(selector)?;
            gradebook.remove_semester(&id)
        })
        .map_err(|e| format!("✗ {e}"))?;
    println!(
        "✓ Removed semester '{}' ({} course(s))",
        removed.name,
        removed.courses.len()
    );
    Ok(())
}

fn rename(selector: &str, name: &str, retag: bool, config: &Config) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("✗ Semester name cannot be empty".to_string());
    }
    let store = open_store(config);
    let term = store
        .update(|gradebook| {
            let id = gradebook.resolve_id(selector)?;
            gradebook.rename_semester(&id, name, retag)?;
            Ok(gradebook.find(&id).and_then(|s| s.term))
        })
        .map_err(|e| format!("✗ {e}"))?;

    match term {
        Some(tag) => println!("✓ Renamed to '{}' (term {tag})", name.trim()),
        None => println!("✓ Renamed to '{}'", name.trim()),
    }
    Ok(())
}

fn move_semester(from: usize, to: usize, config: &Config) -> Result<(), String> {
    let (from_idx, to_idx) = (to_index(from)?, to_index(to)?);
    let store = open_store(config);
    store
        .update(|gradebook| gradebook.move_semester(from_idx, to_idx))
        .map_err(|e| format!("✗ {e}"))?;
    info!("Moved semester {from} -> {to}");
    println!("✓ Moved semester from position {from} to {to}");
    Ok(())
}

fn set_term(
    selector: &str,
    term: Option<&str>,
    clear: bool,
    config: &Config,
) -> Result<(), String> {
    let tag = if clear {
        None
    } else {
        let text = term.unwrap_or_default();
        Some(
            TermTag::infer(text)
                .ok_or_else(|| format!("✗ Not a term: '{text}' (expected e.g. \"Fall 2024\")"))?,
        )
    };

    let store = open_store(config);
    store
        .update(|gradebook| {
            let id = gradebook.resolve_id(selector)?;
            gradebook.set_term(&id, tag)
        })
        .map_err(|e| format!("✗ {e}"))?;

    match tag {
        Some(tag) => println!("✓ Term set to {tag}"),
        None => println!("✓ Term cleared; the semester is now listed under Miscellaneous"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradeplan::core::parser::CourseParser;

    #[test]
    fn test_added_message_uses_stored_name() {
        let mut gradebook = Gradebook::new();
        let parser = CourseParser::default();

        let semester = gradebook
            .add_semester("  Fall 2023  ", "MATH1101 - Calculus I\nA\n4", &parser)
            .unwrap();
        let message = added_message(semester);
        assert!(message.starts_with("✓ Added semester 'Fall 2023' (1 course(s)"));

        let semester = gradebook.add_semester("   ", "", &parser).unwrap();
        assert!(added_message(semester).contains(&format!("'{DEFAULT_SEMESTER_NAME}'")));
    }
}
