//! Semester collection and its persistence
//!
//! [`Gradebook`] is the in-memory collection with every mutation the tool
//! offers (semester and course CRUD, reordering, inline edits). Each mutation
//! recomputes the derived totals of the touched semester from scratch.
//!
//! [`GradebookStore`] persists the whole collection as one JSON array and
//! rewrites it whole on every save; concurrent writers race with
//! last-write-wins. Observers register on the store with an explicit
//! subscribe/unsubscribe pair.

use crate::core::editing::{parse_credits, CourseEdit, CourseRef};
use crate::core::grades::{overall, GradeScale, SemesterTotals};
use crate::core::models::{Course, Semester, TermTag};
use crate::core::organizer::{Organizer, SemesterSection};
use crate::core::parser::CourseParser;
use crate::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by gradebook mutations and the file store
#[derive(Debug, Error)]
pub enum GradebookError {
    /// Non-empty input yielded no course
    #[error("Could not parse any valid courses from the input")]
    NothingParsed,

    /// No semester matches the selector
    #[error("Semester not found: '{0}'")]
    SemesterNotFound(String),

    /// The course index is past the end of the semester
    #[error("Course #{index} not found in semester '{semester_id}'")]
    CourseNotFound {
        /// Semester searched
        semester_id: String,
        /// Requested index
        index: usize,
    },

    /// Credits were not a non-negative number
    #[error("Credits must be a positive number, got '{0}'")]
    InvalidCredits(String),

    /// A reorder position is past the end of the list
    #[error("Position {index} is out of range for {len} item(s)")]
    OutOfRange {
        /// Requested position
        index: usize,
        /// Length of the list
        len: usize,
    },

    /// Reading or writing the data file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The data file holds invalid JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias for gradebook operations
pub type Result<T> = std::result::Result<T, GradebookError>;

/// The ordered semester collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gradebook {
    semesters: Vec<Semester>,
}

impl Gradebook {
    /// Create an empty gradebook
    #[must_use]
    pub const fn new() -> Self {
        Self {
            semesters: Vec::new(),
        }
    }

    /// Wrap an existing semester list
    #[must_use]
    pub const fn from_semesters(semesters: Vec<Semester>) -> Self {
        Self { semesters }
    }

    /// Semesters in user order
    #[must_use]
    pub fn semesters(&self) -> &[Semester] {
        &self.semesters
    }

    /// Number of semesters
    #[must_use]
    pub fn len(&self) -> usize {
        self.semesters.len()
    }

    /// Whether the gradebook holds no semester
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.semesters.is_empty()
    }

    /// Find a semester by id, or by name (case-insensitive) as a fallback
    #[must_use]
    pub fn find(&self, selector: &str) -> Option<&Semester> {
        let selector = selector.trim();
        self.semesters
            .iter()
            .find(|s| s.id == selector)
            .or_else(|| {
                self.semesters
                    .iter()
                    .find(|s| s.name.eq_ignore_ascii_case(selector))
            })
    }

    /// Resolve a selector to a semester id
    ///
    /// # Errors
    /// Returns [`GradebookError::SemesterNotFound`] when nothing matches
    pub fn resolve_id(&self, selector: &str) -> Result<String> {
        self.find(selector)
            .map(|s| s.id.clone())
            .ok_or_else(|| GradebookError::SemesterNotFound(selector.to_string()))
    }

    fn semester_mut(&mut self, id: &str) -> Result<&mut Semester> {
        self.semesters
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| GradebookError::SemesterNotFound(id.to_string()))
    }

    /// Timestamp-derived id, bumped until unique
    fn next_id(&self) -> String {
        let mut candidate = chrono::Utc::now().timestamp_millis();
        while self
            .semesters
            .iter()
            .any(|s| s.id == candidate.to_string())
        {
            candidate += 1;
        }
        candidate.to_string()
    }

    /// Add a semester, optionally populated from pasted course text
    ///
    /// Blank `raw_courses` creates an empty semester.
    ///
    /// # Errors
    /// Returns [`GradebookError::NothingParsed`] when `raw_courses` has content
    /// but no course could be recovered from it
    pub fn add_semester(
        &mut self,
        name: &str,
        raw_courses: &str,
        parser: &CourseParser,
    ) -> Result<&Semester> {
        let courses = if raw_courses.trim().is_empty() {
            Vec::new()
        } else {
            let parsed = parser.parse(raw_courses);
            if parsed.is_empty() {
                return Err(GradebookError::NothingParsed);
            }
            parsed
        };

        let semester = Semester::new(self.next_id(), name, courses);
        info!(
            "Added semester '{}' with {} course(s)",
            semester.name,
            semester.courses.len()
        );
        self.semesters.push(semester);
        let last = self.semesters.len() - 1;
        Ok(&self.semesters[last])
    }

    /// Append courses to a semester
    ///
    /// Blank `raw_courses` appends one blank course row. Returns the index of
    /// the first appended course.
    ///
    /// # Errors
    /// Returns an error if the semester does not exist or the text has content
    /// but yields no course
    pub fn add_courses(
        &mut self,
        semester_id: &str,
        raw_courses: &str,
        parser: &CourseParser,
    ) -> Result<usize> {
        let new_courses = if raw_courses.trim().is_empty() {
            vec![Course::blank()]
        } else {
            let parsed = parser.parse(raw_courses);
            if parsed.is_empty() {
                return Err(GradebookError::NothingParsed);
            }
            parsed
        };

        let semester = self.semester_mut(semester_id)?;
        let first_index = semester.courses.len();
        semester.courses.extend(new_courses);
        semester.recompute_totals();
        debug!(
            "Semester '{}' now holds {} course(s)",
            semester.name,
            semester.courses.len()
        );
        Ok(first_index)
    }

    /// Remove a semester and return it
    ///
    /// # Errors
    /// Returns [`GradebookError::SemesterNotFound`] if no semester has this id
    pub fn remove_semester(&mut self, semester_id: &str) -> Result<Semester> {
        let position = self
            .semesters
            .iter()
            .position(|s| s.id == semester_id)
            .ok_or_else(|| GradebookError::SemesterNotFound(semester_id.to_string()))?;
        Ok(self.semesters.remove(position))
    }

    /// Remove one course and return it
    ///
    /// # Errors
    /// Returns an error if the semester or the course does not exist
    pub fn remove_course(&mut self, at: &CourseRef) -> Result<Course> {
        let semester = self.semester_mut(&at.semester_id)?;
        if at.index >= semester.courses.len() {
            return Err(GradebookError::CourseNotFound {
                semester_id: at.semester_id.clone(),
                index: at.index,
            });
        }
        let removed = semester.courses.remove(at.index);
        semester.recompute_totals();
        Ok(removed)
    }

    /// Rename a semester
    ///
    /// An empty name leaves the current one in place. The term tag is kept
    /// unless `retag` is set.
    ///
    /// # Errors
    /// Returns [`GradebookError::SemesterNotFound`] if no semester has this id
    pub fn rename_semester(&mut self, semester_id: &str, name: &str, retag: bool) -> Result<()> {
        self.semester_mut(semester_id)?.rename(name, retag);
        Ok(())
    }

    /// Replace (or clear) the term tag of a semester
    ///
    /// # Errors
    /// Returns [`GradebookError::SemesterNotFound`] if no semester has this id
    pub fn set_term(&mut self, semester_id: &str, term: Option<TermTag>) -> Result<()> {
        self.semester_mut(semester_id)?.term = term;
        Ok(())
    }

    /// Move the semester at `from` so that it ends up at `to`
    ///
    /// # Errors
    /// Returns [`GradebookError::OutOfRange`] if either position is invalid
    pub fn move_semester(&mut self, from: usize, to: usize) -> Result<()> {
        reorder(&mut self.semesters, from, to)
    }

    /// Move a course within its semester; totals are unaffected
    ///
    /// # Errors
    /// Returns an error if the semester does not exist or a position is invalid
    pub fn move_course(&mut self, semester_id: &str, from: usize, to: usize) -> Result<()> {
        reorder(&mut self.semester_mut(semester_id)?.courses, from, to)
    }

    /// Apply an inline edit and recompute the semester totals
    ///
    /// # Errors
    /// Returns an error if the target does not exist or the credits value is
    /// not a non-negative number. A rejected edit changes nothing.
    pub fn apply_edit(&mut self, edit: &CourseEdit, scale: &GradeScale) -> Result<()> {
        let credits = match edit {
            CourseEdit::Credits { value, .. } => Some(
                parse_credits(value).ok_or_else(|| GradebookError::InvalidCredits(value.clone()))?,
            ),
            _ => None,
        };

        let at = edit.target();
        let semester = self.semester_mut(&at.semester_id)?;
        let course = semester
            .courses
            .get_mut(at.index)
            .ok_or_else(|| GradebookError::CourseNotFound {
                semester_id: at.semester_id.clone(),
                index: at.index,
            })?;

        match edit {
            CourseEdit::Code { value, .. } => course.id = value.trim().to_string(),
            CourseEdit::Title { value, .. } => course.title = value.trim().to_string(),
            CourseEdit::Grade { value, .. } => course.set_grade(value, scale),
            CourseEdit::Credits { .. } => {
                if let Some(credits) = credits {
                    course.set_credits(credits, scale);
                }
            }
        }
        semester.recompute_totals();
        debug!("Applied {} edit to {}#{}", edit.field(), at.semester_id, at.index);
        Ok(())
    }

    /// Totals across every semester
    #[must_use]
    pub fn overall(&self) -> SemesterTotals {
        overall(&self.semesters)
    }

    /// Current section grouping of the semesters
    #[must_use]
    pub fn sections(&self, organizer: &Organizer) -> Vec<SemesterSection<'_>> {
        organizer.organize(&self.semesters)
    }
}

/// Reorder-on-drop: remove the item at `from`, insert it at `to`
fn reorder<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<()> {
    let len = items.len();
    for index in [from, to] {
        if index >= len {
            return Err(GradebookError::OutOfRange { index, len });
        }
    }
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    Ok(())
}

/// Handle returned by [`ChangeNotifier::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&[Semester])>;

/// Observers of gradebook saves
#[derive(Default)]
pub struct ChangeNotifier {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl ChangeNotifier {
    /// Create a notifier with no listener
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; keep the id to unsubscribe later
    pub fn subscribe(&mut self, listener: impl Fn(&[Semester]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns `false` if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Call every listener with the saved semesters
    pub fn notify(&self, semesters: &[Semester]) {
        for (_, listener) in &self.listeners {
            listener(semesters);
        }
    }

    /// Number of registered listeners
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Whole-file JSON store for a [`Gradebook`]
#[derive(Debug)]
pub struct GradebookStore {
    path: PathBuf,
    notifier: ChangeNotifier,
}

impl GradebookStore {
    /// Create a store backed by `path`; nothing is read until [`load`](Self::load)
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole collection
    ///
    /// A missing or empty file is an empty gradebook.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid
    /// semester array
    pub fn load(&self) -> Result<Gradebook> {
        if !self.path.exists() {
            debug!("No data file at {}, starting empty", self.path.display());
            return Ok(Gradebook::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Gradebook::new());
        }
        let gradebook: Gradebook = serde_json::from_str(&content)?;
        debug!(
            "Loaded {} semester(s) from {}",
            gradebook.len(),
            self.path.display()
        );
        Ok(gradebook)
    }

    /// Write the whole collection, then notify subscribers
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file cannot
    /// be written
    pub fn save(&self, gradebook: &Gradebook) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(gradebook)?;
        fs::write(&self.path, json)?;
        debug!(
            "Saved {} semester(s) to {}",
            gradebook.len(),
            self.path.display()
        );
        self.notifier.notify(gradebook.semesters());
        Ok(())
    }

    /// Read-modify-write in one call
    ///
    /// Nothing is written when `mutate` fails.
    ///
    /// # Errors
    /// Returns the error of `load`, `mutate` or `save`
    pub fn update<T>(&self, mutate: impl FnOnce(&mut Gradebook) -> Result<T>) -> Result<T> {
        let mut gradebook = self.load()?;
        let output = mutate(&mut gradebook)?;
        self.save(&gradebook)?;
        Ok(output)
    }

    /// Register a save listener
    pub fn subscribe(&mut self, listener: impl Fn(&[Semester]) + 'static) -> SubscriptionId {
        self.notifier.subscribe(listener)
    }

    /// Remove a save listener
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::editing::CourseField;

    const PASTE: &str = "MATH1101 - Calculus I\nA\n4\nENGL1101 - Composition\nB\n3";

    fn gradebook_with_semester() -> (Gradebook, String) {
        let mut gradebook = Gradebook::new();
        let id = gradebook
            .add_semester("Fall 2023", PASTE, &CourseParser::default())
            .unwrap()
            .id
            .clone();
        (gradebook, id)
    }

    #[test]
    fn test_add_semester_from_paste() {
        let (gradebook, id) = gradebook_with_semester();
        let semester = gradebook.find(&id).unwrap();
        assert_eq!(semester.courses.len(), 2);
        assert!((semester.total_credits - 7.0).abs() < f64::EPSILON);
        assert!((semester.gpa - 3.57).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unparseable_paste_is_rejected() {
        let mut gradebook = Gradebook::new();
        let result = gradebook.add_semester("Fall 2023", "nothing here", &CourseParser::default());
        assert!(matches!(result, Err(GradebookError::NothingParsed)));
        assert!(gradebook.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut gradebook = Gradebook::new();
        let parser = CourseParser::default();
        let first = gradebook.add_semester("A", "", &parser).unwrap().id.clone();
        let second = gradebook.add_semester("B", "", &parser).unwrap().id.clone();
        assert_ne!(first, second);
    }

    #[test]
    fn test_add_blank_course() {
        let (mut gradebook, id) = gradebook_with_semester();
        let index = gradebook
            .add_courses(&id, "  ", &CourseParser::default())
            .unwrap();
        assert_eq!(index, 2);
        let semester = gradebook.find(&id).unwrap();
        assert!(semester.courses[2].is_blank());
        assert!((semester.total_credits - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_remove_course_recomputes() {
        let (mut gradebook, id) = gradebook_with_semester();
        let removed = gradebook.remove_course(&CourseRef::new(&id, 1)).unwrap();
        assert_eq!(removed.id, "ENGL1101");

        let semester = gradebook.find(&id).unwrap();
        assert!((semester.gpa - 4.0).abs() < f64::EPSILON);

        let missing = gradebook.remove_course(&CourseRef::new(&id, 5));
        assert!(matches!(missing, Err(GradebookError::CourseNotFound { .. })));
    }

    #[test]
    fn test_edit_credits_validation() {
        let (mut gradebook, id) = gradebook_with_semester();
        let scale = GradeScale::standard();

        let bad = CourseEdit::new(CourseRef::new(&id, 0), CourseField::Credits, "-2");
        assert!(matches!(
            gradebook.apply_edit(&bad, &scale),
            Err(GradebookError::InvalidCredits(_))
        ));
        assert!((gradebook.find(&id).unwrap().courses[0].credits - 4.0).abs() < f64::EPSILON);

        let good = CourseEdit::new(CourseRef::new(&id, 0), CourseField::Credits, "3");
        gradebook.apply_edit(&good, &scale).unwrap();
        let semester = gradebook.find(&id).unwrap();
        assert!((semester.courses[0].grade_points - 12.0).abs() < f64::EPSILON);
        assert!((semester.total_grade_points - 21.0).abs() < f64::EPSILON);
        assert!((semester.gpa - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_edit_grade_uppercases() {
        let (mut gradebook, id) = gradebook_with_semester();
        let edit = CourseEdit::new(CourseRef::new(&id, 1), CourseField::Grade, "a-");
        gradebook.apply_edit(&edit, &GradeScale::standard()).unwrap();

        let course = &gradebook.find(&id).unwrap().courses[1];
        assert_eq!(course.grade, "A-");
        assert!((course.grade_points - 11.01).abs() < 1e-9);
    }

    #[test]
    fn test_reorder() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        reorder(&mut items, 0, 2).unwrap();
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);
        reorder(&mut items, 3, 0).unwrap();
        assert_eq!(items, vec!['d', 'b', 'c', 'a']);
        assert!(reorder(&mut items, 4, 0).is_err());
    }

    #[test]
    fn test_find_by_name() {
        let (gradebook, id) = gradebook_with_semester();
        assert_eq!(gradebook.resolve_id("fall 2023").unwrap(), id);
        assert!(gradebook.resolve_id("Spring 1999").is_err());
    }

    #[test]
    fn test_notifier_lifecycle() {
        use std::cell::Cell;
        use std::rc::Rc;

        let calls = Rc::new(Cell::new(0));
        let mut notifier = ChangeNotifier::new();
        let seen = Rc::clone(&calls);
        let id = notifier.subscribe(move |_| seen.set(seen.get() + 1));

        notifier.notify(&[]);
        assert_eq!(calls.get(), 1);

        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        notifier.notify(&[]);
        assert_eq!(calls.get(), 1);
        assert!(notifier.is_empty());
    }
}
