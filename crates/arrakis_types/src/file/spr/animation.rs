//! Sprite animation tables.
//!
//! Some sprite sheets carry an animation section after the last frame. It is
//! made of a 14-byte header, a table of *image groups* (frames placed at an
//! offset) and a definition table listing which groups make up each animation
//! frame. Offsets below are relative to the start of the section.
//!
//! | Offset | Size | Description                   |
//! |--------|------|-------------------------------|
//! | 0x00   | 2    | X position (signed)           |
//! | 0x02   | 2    | Y position (signed)           |
//! | 0x04   | 2    | Width                         |
//! | 0x06   | 2    | Height                        |
//! | 0x08   | 2    | Group table offset            |
//! | 0x0A   | 2    | Definition table offset       |
//! | 0x0C   | 2    | Flags                         |
//!
//! Group table entries are `(frame + 1, dx: i8, dy: i8)` triples, a zero byte
//! closes a group. Three dialects of the definition table exist, see
//! [`AnimationDialect`].

use log::trace;
use serde::{Deserialize, Serialize};

use crate::file::{ArFileError, cursor::ByteCursor};

/// Size of the animation section header
pub const ANIMATION_HEADER_SIZE: usize = 14;

/// Definition table layout of a sprite sheet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "dialect", rename_all = "lowercase")]
pub enum AnimationDialect {
	/// Byte list: `1..=254` reference groups, `0` closes a frame, `0xFF` ends
	#[default]
	Generic,

	/// Records of four `u16`, where clear-region rectangles separate frames
	Swap,

	/// Generic table split into several animations by frame index limits
	Segmented {
		/// Largest frame index of each successive animation
		limits: Vec<usize>,
	},
}

/// One frame drawn at an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImagePlacement {
	/// Index into the sprite's frames
	pub frame_index: usize,
	/// Horizontal offset
	pub x_offset: i8,
	/// Vertical offset
	pub y_offset: i8,
}

/// A reusable list of placements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageGroup {
	/// Placements, in drawing order
	pub images: Vec<ImagePlacement>,
}

/// One step of an animation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnimationFrame {
	/// Groups drawn for this step
	pub groups: Vec<ImageGroup>,
}

impl AnimationFrame {
	/// Largest frame index referenced by this step.
	pub fn max_frame_index(&self) -> Option<usize> {
		self.groups.iter().flat_map(|g| g.images.iter()).map(|i| i.frame_index).max()
	}
}

/// A decoded animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteAnimation {
	/// X position
	pub x: i16,
	/// Y position
	pub y: i16,
	/// Width of the animated area
	pub width: u16,
	/// Height of the animated area
	pub height: u16,
	/// Steps of the animation
	pub frames: Vec<AnimationFrame>,
}

#[derive(Debug, Clone, Copy)]
struct SectionHeader {
	x: i16,
	y: i16,
	width: u16,
	height: u16,
	group_table_offset: usize,
	definition_offset: usize,
}

impl SectionHeader {
	fn read(cursor: &mut ByteCursor<'_>) -> Result<Self, ArFileError> {
		let x = cursor.read_i16_le()?;
		let y = cursor.read_i16_le()?;
		let width = cursor.read_u16_le()?;
		let height = cursor.read_u16_le()?;
		let group_table_offset = usize::from(cursor.read_u16_le()?);
		let definition_offset = usize::from(cursor.read_u16_le()?);
		let _flags = cursor.read_u16_le()?;

		Ok(Self {
			x,
			y,
			width,
			height,
			group_table_offset,
			definition_offset,
		})
	}

	fn animation(&self, frames: Vec<AnimationFrame>) -> SpriteAnimation {
		SpriteAnimation {
			x: self.x,
			y: self.y,
			width: self.width,
			height: self.height,
			frames,
		}
	}
}

/// Parses the animation section starting at `start` in `data`.
pub(crate) fn parse(
	data: &[u8],
	start: usize,
	frame_count: usize,
	dialect: &AnimationDialect,
) -> Result<Vec<SpriteAnimation>, ArFileError> {
	let section = data.get(start..).unwrap_or_default();
	let mut cursor = ByteCursor::new(section);
	let header = SectionHeader::read(&mut cursor)?;

	if header.group_table_offset < ANIMATION_HEADER_SIZE
		|| header.group_table_offset > header.definition_offset
		|| header.definition_offset > section.len()
	{
		return Err(ArFileError::malformed_animation(format!(
			"group table at {:#06X}, definitions at {:#06X}, section is {} bytes",
			header.group_table_offset,
			header.definition_offset,
			section.len()
		)));
	}

	let mut group_cursor = cursor.sub_cursor(header.group_table_offset, header.definition_offset)?;
	let groups = read_groups(&mut group_cursor, frame_count)?;
	trace!("animation section: {} groups", groups.len());

	cursor.seek(header.definition_offset)?;
	let animations = match dialect {
		AnimationDialect::Generic => vec![header.animation(read_generic(&mut cursor, &groups)?)],
		AnimationDialect::Swap => vec![header.animation(read_swap(&mut cursor, &groups)?)],
		AnimationDialect::Segmented {
			limits,
		} => split_segments(read_generic(&mut cursor, &groups)?, limits)
			.into_iter()
			.map(|frames| header.animation(frames))
			.collect(),
	};

	Ok(animations)
}

fn read_groups(
	cursor: &mut ByteCursor<'_>,
	frame_count: usize,
) -> Result<Vec<ImageGroup>, ArFileError> {
	let mut groups = Vec::new();
	let mut current = ImageGroup::default();

	while !cursor.is_eof() {
		let frame_number = cursor.read_byte()?;
		if frame_number == 0 {
			groups.push(std::mem::take(&mut current));
			continue;
		}

		let frame_index = usize::from(frame_number) - 1;
		if frame_index >= frame_count {
			return Err(ArFileError::malformed_animation(format!(
				"group {} references frame {frame_index}, sprite has {frame_count}",
				groups.len() + 1
			)));
		}
		current.images.push(ImagePlacement {
			frame_index,
			x_offset: cursor.read_signed_byte()?,
			y_offset: cursor.read_signed_byte()?,
		});
	}
	if !current.images.is_empty() {
		groups.push(current);
	}

	Ok(groups)
}

fn group(groups: &[ImageGroup], number: usize) -> Result<&ImageGroup, ArFileError> {
	number.checked_sub(1).and_then(|i| groups.get(i)).ok_or_else(|| {
		ArFileError::malformed_animation(format!(
			"reference to group {number}, table has {}",
			groups.len()
		))
	})
}

fn read_generic(
	cursor: &mut ByteCursor<'_>,
	groups: &[ImageGroup],
) -> Result<Vec<AnimationFrame>, ArFileError> {
	let mut frames = Vec::new();
	let mut current = AnimationFrame::default();

	loop {
		match cursor.read_byte()? {
			0x00 => frames.push(std::mem::take(&mut current)),
			0xFF => {
				if !current.groups.is_empty() {
					frames.push(current);
				}
				break;
			}
			number => current.groups.push(group(groups, usize::from(number))?.clone()),
		}
	}

	Ok(frames)
}

fn read_swap(
	cursor: &mut ByteCursor<'_>,
	groups: &[ImageGroup],
) -> Result<Vec<AnimationFrame>, ArFileError> {
	let mut frames = Vec::new();
	let mut current = AnimationFrame::default();
	let mut previous_lead: Option<u16> = None;

	loop {
		let lead = cursor.read_u16_le()?;
		if lead == 0xFFFF {
			break;
		}
		let b = cursor.read_u16_le()?;
		let c = cursor.read_u16_le()?;
		let d = cursor.read_u16_le()?;

		let follows_previous = previous_lead.is_some_and(|p| p.wrapping_add(1) == lead);
		if lead < c && b < d && !follows_previous {
			// clear-region rectangle
			if !current.groups.is_empty() {
				frames.push(std::mem::take(&mut current));
			}
		} else {
			current.groups.push(group(groups, usize::from(lead))?.clone());
		}
		previous_lead = Some(lead);
	}
	if !current.groups.is_empty() {
		frames.push(current);
	}

	Ok(frames)
}

/// Splits a flat frame list at the points where the referenced frame index
/// exceeds the current limit.
fn split_segments(frames: Vec<AnimationFrame>, limits: &[usize]) -> Vec<Vec<AnimationFrame>> {
	let mut segments = vec![Vec::new()];
	let mut limit = 0;

	for frame in frames {
		if let Some(max) = frame.max_frame_index() {
			let mut advanced = false;
			while limit + 1 < limits.len() && max > limits[limit] {
				limit += 1;
				advanced = true;
			}
			let current_is_empty = segments.last().is_some_and(Vec::is_empty);
			if advanced && !current_is_empty {
				segments.push(Vec::new());
			}
		}
		if let Some(segment) = segments.last_mut() {
			segment.push(frame);
		}
	}

	segments
}
