use crate::btf::{BtfError, Endianness, Result};

/// Simple bounded cursor over an immutable byte slice.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
	endianness: Endianness,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0 reading with the given byte order.
	pub fn new(bytes: &'a [u8], endianness: Endianness) -> Self {
		Self { bytes, pos: 0, endianness }
	}

	/// Create a cursor positioned at `pos`.
	pub fn at(bytes: &'a [u8], pos: usize, endianness: Endianness) -> Result<Self> {
		if pos > bytes.len() {
			return Err(BtfError::UnexpectedEof {
				at: pos,
				need: 0,
				rem: 0,
			});
		}
		Ok(Self { bytes, pos, endianness })
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Whether every byte has been consumed.
	pub fn is_empty(&self) -> bool {
		self.remaining() == 0
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(BtfError::UnexpectedEof {
				at: self.pos,
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Skip `n` bytes.
	pub fn skip(&mut self, n: usize) -> Result<()> {
		let _ = self.read_exact(n)?;
		Ok(())
	}

	/// Read one byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_exact(1)?[0])
	}

	/// Read a `u16` in the cursor byte order.
	pub fn read_u16(&mut self) -> Result<u16> {
		let raw = self.read_exact(2)?;
		let mut buf = [0_u8; 2];
		buf.copy_from_slice(raw);
		Ok(match self.endianness {
			Endianness::Little => u16::from_le_bytes(buf),
			Endianness::Big => u16::from_be_bytes(buf),
		})
	}

	/// Read a `u32` in the cursor byte order.
	pub fn read_u32(&mut self) -> Result<u32> {
		let raw = self.read_exact(4)?;
		let mut buf = [0_u8; 4];
		buf.copy_from_slice(raw);
		Ok(match self.endianness {
			Endianness::Little => u32::from_le_bytes(buf),
			Endianness::Big => u32::from_be_bytes(buf),
		})
	}

	/// Read an `i32` in the cursor byte order.
	pub fn read_i32(&mut self) -> Result<i32> {
		let raw = self.read_exact(4)?;
		let mut buf = [0_u8; 4];
		buf.copy_from_slice(raw);
		Ok(match self.endianness {
			Endianness::Little => i32::from_le_bytes(buf),
			Endianness::Big => i32::from_be_bytes(buf),
		})
	}

	/// Read a `u64` in the cursor byte order.
	pub fn read_u64(&mut self) -> Result<u64> {
		let raw = self.read_exact(8)?;
		let mut buf = [0_u8; 8];
		buf.copy_from_slice(raw);
		Ok(match self.endianness {
			Endianness::Little => u64::from_le_bytes(buf),
			Endianness::Big => u64::from_be_bytes(buf),
		})
	}

	/// Read an ELF word: `u32` for 32-bit images, `u64` for 64-bit ones.
	pub fn read_word(&mut self, wide: bool) -> Result<u64> {
		if wide { self.read_u64() } else { Ok(u64::from(self.read_u32()?)) }
	}

	/// Read a zero-terminated byte string without the terminator.
	pub fn read_cstring_bytes(&mut self) -> Result<&'a [u8]> {
		let start = self.pos;
		let rem = &self.bytes[self.pos..];
		let Some(rel_end) = rem.iter().position(|byte| *byte == 0) else {
			return Err(BtfError::UnexpectedEof {
				at: self.pos,
				need: 1,
				rem: self.remaining(),
			});
		};

		let end = start + rel_end;
		self.pos = end + 1;
		Ok(&self.bytes[start..end])
	}
}

/// Borrow `len` bytes at `start`, failing with an EOF error when out of range.
pub fn slice_at(bytes: &[u8], start: usize, len: usize) -> Result<&[u8]> {
	start
		.checked_add(len)
		.and_then(|end| bytes.get(start..end))
		.ok_or(BtfError::UnexpectedEof {
			at: start,
			need: len,
			rem: bytes.len().saturating_sub(start),
		})
}
