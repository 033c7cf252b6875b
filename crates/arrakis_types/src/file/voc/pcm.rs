//! Conversion of a block stream to playable chunks.
//!
//! Repeated sections are expanded here: blocks between `RepeatStart(count)` and
//! the matching `RepeatEnd` are emitted `count` times, nested sections
//! included. The expanded size is checked before any copy, so nested counts
//! cannot allocate past [`MAX_EXPANDED_BYTES`].

use log::warn;

use crate::file::{ArFileError, FileType};

use super::{
	constants::{ENDLESS_REPEAT, MAX_EXPANDED_BYTES, SILENCE_LEVEL},
	types::{Codec, PcmChunk, SoundBlock},
};

/// Output slot before expansion. Errors are stored as the codec byte so that
/// repeated sections can be cloned.
type Slot = Result<PcmChunk, u8>;

fn cost(slot: &Slot) -> usize {
	slot.as_ref().map_or(1, |chunk| chunk.bytes.len().max(1))
}

#[derive(Default)]
struct Section {
	count: u16,
	slots: Vec<Slot>,
	size: usize,
}

impl Section {
	fn push(&mut self, slot: Slot) -> Result<(), ArFileError> {
		self.size = grow(self.size, cost(&slot), 1)?;
		self.slots.push(slot);
		Ok(())
	}

	fn close_into(self, into: &mut Section) -> Result<(), ArFileError> {
		let times = if self.count == ENDLESS_REPEAT {
			warn!("VOC: endless repeat played once");
			1
		} else {
			usize::from(self.count)
		};
		into.size = grow(into.size, self.size, times)?;
		for _ in 0..times {
			into.slots.extend(self.slots.iter().cloned());
		}
		Ok(())
	}
}

/// Returns `total + size * times`, or an error past the expansion limit.
fn grow(total: usize, size: usize, times: usize) -> Result<usize, ArFileError> {
	size.checked_mul(times)
		.and_then(|added| added.checked_add(total))
		.filter(|&grown| grown <= MAX_EXPANDED_BYTES)
		.ok_or(ArFileError::ExpansionLimit {
			file_type: FileType::Voc,
			limit: MAX_EXPANDED_BYTES,
		})
}

/// Expands `blocks` into playable chunks, in play order.
///
/// Per-chunk failures (unknown codecs) are kept in their slot. The outer
/// error is [`ArFileError::ExpansionLimit`].
pub fn to_pcm(
	blocks: &[SoundBlock],
) -> Result<Vec<Result<PcmChunk, ArFileError>>, ArFileError> {
	let mut root = Section::default();
	let mut stack: Vec<Section> = Vec::new();

	for block in blocks {
		let slot = match block {
			SoundBlock::Terminate => break,
			SoundBlock::RepeatStart {
				count,
			} => {
				stack.push(Section {
					count: *count,
					..Section::default()
				});
				continue;
			}
			SoundBlock::RepeatEnd => {
				match stack.pop() {
					Some(section) => section.close_into(stack.last_mut().unwrap_or(&mut root))?,
					None => warn!("VOC: repeat end without a repeat start"),
				}
				continue;
			}
			SoundBlock::SoundData {
				codec: Codec::Unknown(value),
				..
			} => Err(*value),
			SoundBlock::SoundData {
				codec,
				sample_rate,
				bytes,
			} => Ok(PcmChunk {
				codec: *codec,
				sample_rate: *sample_rate,
				bytes: bytes.clone(),
			}),
			SoundBlock::Silence {
				sample_rate,
				length,
				..
			} => Ok(PcmChunk {
				codec: Codec::Pcm8Unsigned,
				sample_rate: *sample_rate,
				bytes: vec![SILENCE_LEVEL; usize::from(*length)],
			}),
			SoundBlock::Marker {
				..
			}
			| SoundBlock::StringBlock {
				..
			}
			| SoundBlock::Unknown {
				..
			} => continue,
		};

		stack.last_mut().unwrap_or(&mut root).push(slot)?;
	}

	if !stack.is_empty() {
		warn!("VOC: {} unterminated repeat sections", stack.len());
	}
	while let Some(section) = stack.pop() {
		section.close_into(stack.last_mut().unwrap_or(&mut root))?;
	}

	Ok(root.slots.into_iter().map(|slot| slot.map_err(ArFileError::UnsupportedCodec)).collect())
}
