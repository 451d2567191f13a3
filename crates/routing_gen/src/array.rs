//! Minimal NumPy `.npy` writer for `u8` element arrays.
//!
//! Format: a `\x93NUMPY` magic, a 2-byte version, a little-endian `u16`
//! header length, an ASCII header dict padded with spaces (and a
//! terminating newline) so the whole preamble is 16-byte aligned, then the
//! raw element bytes.

use std::io::Write;
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::{GenError, Result};

const MAGIC: &[u8] = b"\x93NUMPY";
const VERSION: [u8; 2] = [1, 0];

/// Write `data` (in row-major order matching `shape`) as a `.npy` file.
pub fn write_u8_array(path: &Path, data: &[u8], shape: &[u8]) -> Result<()> {
  let shape_str = shape
    .iter()
    .map(|d| d.to_string())
    .collect::<Vec<_>>()
    .join(", ");
  let shape_str = if shape.len() == 1 {
    format!("{shape_str},")
  } else {
    shape_str
  };

  let header = format!("{{'descr': '<u1', 'fortran_order': False, 'shape': ({shape_str}), }}");

  let preamble_fixed = MAGIC.len() + VERSION.len() + 2;
  let unpadded_total = preamble_fixed + header.len() + 1; // +1 for the terminating newline
  let padding = (16 - unpadded_total % 16) % 16;
  let header_len = header.len() + padding + 1;

  let mut buffer = Vec::with_capacity(preamble_fixed + header_len + data.len());
  buffer.write_all(MAGIC).expect("writing to a Vec cannot fail");
  buffer.write_all(&VERSION).expect("writing to a Vec cannot fail");
  buffer
    .write_u16::<LittleEndian>(header_len as u16)
    .expect("writing to a Vec cannot fail");
  buffer.write_all(header.as_bytes()).expect("writing to a Vec cannot fail");
  buffer.resize(buffer.len() + padding, b' ');
  buffer.push(b'\n');
  buffer.extend_from_slice(data);

  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).map_err(|source| GenError::IOError {
      path: parent.to_path_buf(),
      source,
    })?;
  }

  std::fs::write(path, &buffer).map_err(|source| GenError::IOError {
    path: path.to_path_buf(),
    source,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn header_is_16_byte_aligned() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.npy");
    write_u8_array(&path, &[1, 2, 3, 4, 5, 6], &[1, 2, 3]).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[0..6], MAGIC);
    assert_eq!(&bytes[6..8], &VERSION);

    let header_len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
    assert_eq!((10 + header_len) % 16, 0);

    let header = std::str::from_utf8(&bytes[10..10 + header_len]).unwrap();
    assert!(header.trim_end().ends_with(')'));
    assert!(header.ends_with('\n'));
  }

  #[test]
  fn payload_follows_header_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.npy");
    let data = vec![9u8; 24];
    write_u8_array(&path, &data, &[2, 3, 4]).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[bytes.len() - 24..], data.as_slice());
  }
}
