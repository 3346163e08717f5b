use indexmap::IndexMap;
use serde::Deserialize;
use tracing::warn;

/// Where a mailbox goes on the map, in mailbox units.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridPosition {
    pub x: u32,
    pub y: u32,
}

/// The assumed physical arrangement of boxes, boards and mailboxes.
///
/// Mailboxes form a 4x4 grid on each board, boards form a 3x2 grid in each
/// box. Box coordinates are measured in board units.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub board_spacing: u32,
    pub box_spacing_x: u32,
    pub box_spacing_y: u32,
    pub boxes: IndexMap<String, (u32, u32)>,
}

impl Default for Layout {
    fn default() -> Self {
        let boxes = [
            ("LoneBox", (0, 0)),
            ("Ay", (0, 0)),
            ("By", (0, 0)),
            ("Co", (1, 0)),
            ("De", (0, 1)),
            ("El", (1, 1)),
            ("Fi", (0, 2)),
            ("Go", (1, 2)),
            ("He", (0, 3)),
            ("Ib", (1, 3)),
        ]
        .into_iter()
        .map(|(name, pos)| (name.to_string(), pos))
        .collect();
        Layout {
            board_spacing: 4,
            box_spacing_x: 3,
            box_spacing_y: 2,
            boxes,
        }
    }
}

fn digit_pair(s: &str) -> Option<(u32, u32)> {
    let mut chars = s.chars().skip(1);
    let x = chars.next()?.to_digit(10)?;
    let y = chars.next()?.to_digit(10)?;
    Some((x, y))
}

impl Layout {
    /// Infers the map position of a mailbox from its name, of the form
    /// `O_.<engine root>.<engine ext>.<box>.B<x><y>.M<x><y>`.
    ///
    /// Returns `None` (and warns) for names that don't follow this form or
    /// that name an unknown box.
    pub fn position(&self, name: &str) -> Option<GridPosition> {
        let res = self.decode(name);
        if res.is_none() {
            warn!("not sure how to decode name '{name}'; not positioning any nodes explicitly");
        }
        res
    }

    fn decode(&self, name: &str) -> Option<GridPosition> {
        let parts: Vec<&str> = name.split('.').collect();
        let &[_, _, _, box_, board, mbox] = &parts[..] else {
            return None;
        };
        let (bx, by) = digit_pair(board)?;
        let (mx, my) = digit_pair(mbox)?;
        let &(box_x, box_y) = self.boxes.get(box_)?;
        Some(GridPosition {
            x: box_x * self.box_spacing_x + bx * self.board_spacing + mx,
            y: box_y * self.box_spacing_y + by * self.board_spacing + my,
        })
    }

    /// Positions every node, or none at all if any of them can't be placed.
    pub fn positions<'a>(
        &self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Option<IndexMap<&'a str, GridPosition>> {
        names
            .into_iter()
            .map(|name| Some((name, self.position(name)?)))
            .collect()
    }
}
