//! Editable grid layout: dimensions, landmarks and walls
//!
//! Every edit validates before mutating, so a rejected edit leaves the layout
//! exactly as it was. The invariants maintained here are:
//!
//! - every landmark and wall lies inside the grid
//! - no two landmarks share a cell and no landmark sits on a wall
//! - exactly one landmark is the start, at most one is the target, and the
//!   start is never the target

use std::{
    collections::{BTreeMap, BTreeSet},
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use serde::{Deserialize, Serialize};

use super::landmark::Landmark;
use crate::{Error, Result, types::Cell};

/// Smallest allowed grid side.
pub const MIN_GRID_SIDE: usize = 2;
/// Largest allowed grid side.
pub const MAX_GRID_SIDE: usize = 15;

/// What [`GridLayout::toggle_cell`] did to the clicked cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellEdit {
    WallAdded,
    WallRemoved,
    LandmarkRemoved(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    height: usize,
    width: usize,
    landmarks: BTreeMap<String, Landmark>,
    #[serde(default)]
    walls: BTreeSet<Cell>,
}

impl GridLayout {
    /// Create an empty layout holding only the start landmark.
    pub fn new(
        height: usize,
        width: usize,
        start_name: impl Into<String>,
        start: impl Into<Cell>,
    ) -> Result<Self> {
        check_dimensions(height, width)?;
        let start = start.into();
        let name = start_name.into().trim().to_string();
        if name.is_empty() {
            return Err(Error::EmptyLandmarkName);
        }
        if !start.in_bounds(height, width) {
            return Err(Error::OutOfBounds {
                cell: start,
                height,
                width,
            });
        }

        let mut landmarks = BTreeMap::new();
        landmarks.insert(name, Landmark::new(start, 0.0, "🏠").as_start());
        Ok(Self {
            height,
            width,
            landmarks,
            walls: BTreeSet::new(),
        })
    }

    /// The default 7x9 campus map.
    pub fn campus() -> Self {
        let landmarks = [
            ("Ijokha Hostel", Landmark::new((6, 0), 0.0, "🏠").as_start()),
            ("Tea Post", Landmark::new((5, 2), -0.5, "☕")),
            ("Atul Bakery", Landmark::new((4, 4), -0.2, "🥐")),
            ("Friend Meet", Landmark::new((3, 1), -1.0, "👋")),
            ("Library", Landmark::new((2, 5), 0.5, "📚")),
            ("Dogs", Landmark::new((0, 3), -0.1, "🐕")),
            ("Workspace", Landmark::new((3, 3), 2.0, "💻")),
            ("2D", Landmark::new((1, 5), -2.0, "🍵")),
            ("AB10", Landmark::new((0, 8), 500.0, "🏛️").as_target()),
        ];
        Self {
            height: 7,
            width: 9,
            landmarks: landmarks
                .into_iter()
                .map(|(name, lm)| (name.to_string(), lm))
                .collect(),
            walls: [Cell::new(5, 4), Cell::new(4, 2), Cell::new(1, 6)]
                .into_iter()
                .collect(),
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.in_bounds(self.height, self.width)
    }

    pub fn landmarks(&self) -> impl Iterator<Item = (&str, &Landmark)> {
        self.landmarks.iter().map(|(name, lm)| (name.as_str(), lm))
    }

    pub fn landmark(&self, name: &str) -> Option<&Landmark> {
        self.landmarks.get(name)
    }

    pub fn landmark_at(&self, cell: Cell) -> Option<(&str, &Landmark)> {
        self.landmarks().find(|(_, lm)| lm.position == cell)
    }

    pub fn walls(&self) -> impl Iterator<Item = Cell> + '_ {
        self.walls.iter().copied()
    }

    pub fn is_wall(&self, cell: Cell) -> bool {
        self.walls.contains(&cell)
    }

    /// The start landmark.
    ///
    /// # Panics
    ///
    /// If the layout has no start landmark. Constructors, edits and
    /// [`GridLayout::from_json`] all keep exactly one, so this only fires on
    /// a layout deserialised without going through [`GridLayout::validate`].
    pub fn start(&self) -> (&str, &Landmark) {
        self.landmarks()
            .find(|(_, lm)| lm.is_start)
            .expect("layout invariant: exactly one start landmark")
    }

    pub fn start_cell(&self) -> Cell {
        self.start().1.position
    }

    pub fn target(&self) -> Option<(&str, &Landmark)> {
        self.landmarks().find(|(_, lm)| lm.is_target)
    }

    /// Change the grid size, clamping each side to 2-15.
    ///
    /// Walls outside the new bounds are dropped. Rejected if a landmark would
    /// fall outside.
    pub fn resize(&mut self, height: usize, width: usize) -> Result<()> {
        let height = height.clamp(MIN_GRID_SIDE, MAX_GRID_SIDE);
        let width = width.clamp(MIN_GRID_SIDE, MAX_GRID_SIDE);
        if let Some((_, lm)) = self
            .landmarks()
            .find(|(_, lm)| !lm.position.in_bounds(height, width))
        {
            return Err(Error::OutOfBounds {
                cell: lm.position,
                height,
                width,
            });
        }
        self.height = height;
        self.width = width;
        self.walls.retain(|w| w.in_bounds(height, width));
        Ok(())
    }

    /// Place a new landmark. Marking it as target clears the previous target.
    pub fn add_landmark(&mut self, name: impl Into<String>, landmark: Landmark) -> Result<()> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(Error::EmptyLandmarkName);
        }
        if self.landmarks.contains_key(&name) {
            return Err(Error::DuplicateLandmark { name });
        }
        if landmark.is_start {
            return Err(Error::DuplicateRole { role: "start" });
        }
        self.check_free(landmark.position)?;

        if landmark.is_target {
            self.clear_target();
        }
        self.landmarks.insert(name, landmark);
        Ok(())
    }

    /// Delete a landmark. The start landmark cannot be removed.
    pub fn remove_landmark(&mut self, name: &str) -> Result<Landmark> {
        let lm = self.existing(name)?;
        if lm.is_start {
            return Err(Error::StartLandmarkLocked {
                name: name.to_string(),
            });
        }
        self.landmarks
            .remove(name)
            .ok_or_else(|| Error::UnknownLandmark {
                name: name.to_string(),
            })
    }

    /// Relocate a landmark. The start landmark cannot be moved.
    pub fn move_landmark(&mut self, name: &str, to: impl Into<Cell>) -> Result<()> {
        let to = to.into();
        let lm = self.existing(name)?;
        if lm.is_start {
            return Err(Error::StartLandmarkLocked {
                name: name.to_string(),
            });
        }
        if lm.position == to {
            return Ok(());
        }
        self.check_free(to)?;
        if let Some(lm) = self.landmarks.get_mut(name) {
            lm.position = to;
        }
        Ok(())
    }

    pub fn set_reward(&mut self, name: &str, reward: f64) -> Result<()> {
        self.existing(name)?;
        if let Some(lm) = self.landmarks.get_mut(name) {
            lm.reward = reward;
        }
        Ok(())
    }

    /// Flip the target flag on `name` and clear it everywhere else.
    ///
    /// The start landmark can never become the target.
    pub fn toggle_target(&mut self, name: &str) -> Result<()> {
        if self.existing(name)?.is_start {
            return Err(Error::StartLandmarkLocked {
                name: name.to_string(),
            });
        }
        for (key, lm) in self.landmarks.iter_mut() {
            lm.is_target = if key == name { !lm.is_target } else { false };
        }
        Ok(())
    }

    /// Place a wall on an empty cell.
    pub fn add_wall(&mut self, cell: impl Into<Cell>) -> Result<()> {
        let cell = cell.into();
        self.check_free(cell)?;
        self.walls.insert(cell);
        Ok(())
    }

    /// Editor click on a cell: removes a wall or a landmark if present,
    /// otherwise builds a wall. Clicking the start cell is rejected.
    pub fn toggle_cell(&mut self, cell: impl Into<Cell>) -> Result<CellEdit> {
        let cell = cell.into();
        self.check_bounds(cell)?;
        if let Some((name, lm)) = self.landmark_at(cell) {
            if lm.is_start {
                return Err(Error::StartLandmarkLocked {
                    name: name.to_string(),
                });
            }
            let name = name.to_string();
            self.landmarks.remove(&name);
            return Ok(CellEdit::LandmarkRemoved(name));
        }
        if self.walls.remove(&cell) {
            Ok(CellEdit::WallRemoved)
        } else {
            self.walls.insert(cell);
            Ok(CellEdit::WallAdded)
        }
    }

    /// Check every layout invariant. Used after deserialisation.
    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.height, self.width)?;

        let mut occupied = BTreeSet::new();
        for wall in &self.walls {
            self.check_bounds(*wall)?;
            occupied.insert(*wall);
        }
        for (name, lm) in &self.landmarks {
            if name.trim().is_empty() {
                return Err(Error::EmptyLandmarkName);
            }
            self.check_bounds(lm.position)?;
            if !occupied.insert(lm.position) {
                return Err(Error::CellOccupied { cell: lm.position });
            }
            if lm.is_start && lm.is_target {
                return Err(Error::StartIsTarget { name: name.clone() });
            }
        }

        match self.landmarks.values().filter(|lm| lm.is_start).count() {
            0 => return Err(Error::MissingStart),
            1 => {}
            _ => return Err(Error::DuplicateRole { role: "start" }),
        }
        if self.landmarks.values().filter(|lm| lm.is_target).count() > 1 {
            return Err(Error::DuplicateRole { role: "target" });
        }
        Ok(())
    }

    /// Parse and validate a layout from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let layout: GridLayout = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open layout {}", path.display()),
            source,
        })?;
        let layout: GridLayout = serde_json::from_reader(BufReader::new(file))?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create layout {}", path.display()),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    fn existing(&self, name: &str) -> Result<&Landmark> {
        self.landmarks.get(name).ok_or_else(|| Error::UnknownLandmark {
            name: name.to_string(),
        })
    }

    fn check_bounds(&self, cell: Cell) -> Result<()> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                cell,
                height: self.height,
                width: self.width,
            })
        }
    }

    fn check_free(&self, cell: Cell) -> Result<()> {
        self.check_bounds(cell)?;
        if self.is_wall(cell) || self.landmark_at(cell).is_some() {
            return Err(Error::CellOccupied { cell });
        }
        Ok(())
    }

    fn clear_target(&mut self) {
        for lm in self.landmarks.values_mut() {
            lm.is_target = false;
        }
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::campus()
    }
}

fn check_dimensions(height: usize, width: usize) -> Result<()> {
    let valid = MIN_GRID_SIDE..=MAX_GRID_SIDE;
    if valid.contains(&height) && valid.contains(&width) {
        Ok(())
    } else {
        Err(Error::InvalidDimensions { height, width })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campus_layout_is_valid() {
        let layout = GridLayout::campus();
        layout.validate().unwrap();
        assert_eq!((layout.height(), layout.width()), (7, 9));
        assert_eq!(layout.start(), ("Ijokha Hostel", layout.landmark("Ijokha Hostel").unwrap()));
        assert_eq!(layout.target().unwrap().0, "AB10");
        assert_eq!(layout.walls().count(), 3);
    }

    #[test]
    fn test_add_landmark_rejects_occupied_cells() {
        let mut layout = GridLayout::campus();
        let before = layout.clone();

        let on_wall = layout.add_landmark("Canteen", Landmark::new((5, 4), 1.0, "🍜"));
        assert!(matches!(on_wall, Err(Error::CellOccupied { .. })));

        let on_landmark = layout.add_landmark("Canteen", Landmark::new((3, 3), 1.0, "🍜"));
        assert!(matches!(on_landmark, Err(Error::CellOccupied { .. })));

        let outside = layout.add_landmark("Canteen", Landmark::new((7, 0), 1.0, "🍜"));
        assert!(matches!(outside, Err(Error::OutOfBounds { .. })));

        let duplicate = layout.add_landmark("Library", Landmark::new((2, 2), 1.0, "📚"));
        assert!(matches!(duplicate, Err(Error::DuplicateLandmark { .. })));

        let blank = layout.add_landmark("   ", Landmark::new((2, 2), 1.0, "?"));
        assert!(matches!(blank, Err(Error::EmptyLandmarkName)));

        assert_eq!(layout, before);
    }

    #[test]
    fn test_new_target_clears_previous() {
        let mut layout = GridLayout::campus();
        layout
            .add_landmark("Canteen", Landmark::new((2, 2), 10.0, "🍜").as_target())
            .unwrap();
        assert_eq!(layout.target().unwrap().0, "Canteen");
        assert!(!layout.landmark("AB10").unwrap().is_target);
    }

    #[test]
    fn test_toggle_target() {
        let mut layout = GridLayout::campus();
        layout.toggle_target("Library").unwrap();
        assert_eq!(layout.target().unwrap().0, "Library");

        layout.toggle_target("Library").unwrap();
        assert!(layout.target().is_none());
    }

    #[test]
    fn test_start_landmark_is_locked() {
        let mut layout = GridLayout::campus();
        assert!(matches!(
            layout.remove_landmark("Ijokha Hostel"),
            Err(Error::StartLandmarkLocked { .. })
        ));
        assert!(matches!(
            layout.move_landmark("Ijokha Hostel", (6, 1)),
            Err(Error::StartLandmarkLocked { .. })
        ));
        assert!(matches!(
            layout.toggle_cell((6, 0)),
            Err(Error::StartLandmarkLocked { .. })
        ));
        assert_eq!(layout.start_cell(), Cell::new(6, 0));
    }

    #[test]
    fn test_start_landmark_cannot_become_target() {
        let mut layout = GridLayout::campus();
        let before = layout.clone();

        assert!(matches!(
            layout.toggle_target("Ijokha Hostel"),
            Err(Error::StartLandmarkLocked { .. })
        ));
        assert_eq!(layout, before);
        assert_eq!(layout.target().unwrap().0, "AB10");
    }

    #[test]
    fn test_validate_rejects_start_that_is_also_target() {
        let json = serde_json::to_string(&GridLayout::campus())
            .unwrap()
            .replace("\"is_target\":true", "\"is_target\":false")
            .replace(
                "\"is_target\":false,\"is_start\":true",
                "\"is_target\":true,\"is_start\":true",
            );
        assert!(matches!(
            GridLayout::from_json(&json),
            Err(Error::StartIsTarget { name }) if name == "Ijokha Hostel"
        ));
    }

    #[test]
    #[should_panic(expected = "exactly one start landmark")]
    fn test_start_panics_on_unvalidated_layout() {
        let json = serde_json::to_string(&GridLayout::campus())
            .unwrap()
            .replace("\"is_start\":true", "\"is_start\":false");
        let layout: GridLayout = serde_json::from_str(&json).unwrap();
        assert!(GridLayout::from_json(&json).is_err());
        layout.start();
    }

    #[test]
    fn test_toggle_cell_cycle() {
        let mut layout = GridLayout::campus();
        assert_eq!(layout.toggle_cell((2, 2)).unwrap(), CellEdit::WallAdded);
        assert!(layout.is_wall(Cell::new(2, 2)));
        assert_eq!(layout.toggle_cell((2, 2)).unwrap(), CellEdit::WallRemoved);
        assert!(!layout.is_wall(Cell::new(2, 2)));
        assert_eq!(
            layout.toggle_cell((0, 3)).unwrap(),
            CellEdit::LandmarkRemoved("Dogs".to_string())
        );
        assert!(layout.landmark("Dogs").is_none());
    }

    #[test]
    fn test_move_landmark() {
        let mut layout = GridLayout::campus();
        layout.move_landmark("Dogs", (0, 4)).unwrap();
        assert_eq!(layout.landmark("Dogs").unwrap().position, Cell::new(0, 4));
        assert!(layout.move_landmark("Dogs", (1, 6)).is_err());
        assert!(layout.move_landmark("Nobody", (0, 0)).is_err());
    }

    #[test]
    fn test_resize_clamps_and_prunes_walls() {
        let mut layout = GridLayout::new(5, 5, "Home", (0, 0)).unwrap();
        layout.add_wall((4, 4)).unwrap();
        layout.resize(3, 40).unwrap();
        assert_eq!((layout.height(), layout.width()), (3, MAX_GRID_SIDE));
        assert_eq!(layout.walls().count(), 0);

        layout.resize(0, 0).unwrap();
        assert_eq!((layout.height(), layout.width()), (MIN_GRID_SIDE, MIN_GRID_SIDE));
    }

    #[test]
    fn test_resize_rejects_stranded_landmark() {
        let mut layout = GridLayout::campus();
        assert!(layout.resize(5, 9).is_err());
        assert_eq!(layout.height(), 7);
    }

    #[test]
    fn test_json_roundtrip_validates() {
        let layout = GridLayout::campus();
        let json = serde_json::to_string(&layout).unwrap();
        assert_eq!(GridLayout::from_json(&json).unwrap(), layout);

        let broken = json.replace("\"is_start\":true", "\"is_start\":false");
        assert!(matches!(
            GridLayout::from_json(&broken),
            Err(Error::MissingStart)
        ));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(GridLayout::new(1, 5, "Home", (0, 0)).is_err());
        assert!(GridLayout::new(5, 16, "Home", (0, 0)).is_err());
        assert!(GridLayout::new(5, 5, "Home", (5, 0)).is_err());
    }
}
