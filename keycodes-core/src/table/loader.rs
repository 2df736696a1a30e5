use super::error::{Result, TableError};
use super::{FLAG_AUTO_KEY_NAMES, FLAG_SECTION_NAME, HEADER_SIZE, MAGIC, MAJOR_VERSION, MINOR_VERSION};
use crate::keymap::{Key, KeyAlias, Keymap};
use crate::types::{KeyName, KEYCODE_MAX, NUM_INDICATORS};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

struct Header {
    min_key_code: u32,
    max_key_code: u32,
    key_count: u32,
    alias_count: u16,
    indicator_count: u8,
    flags: u8,
}

pub struct KctLoader;

impl KctLoader {
    /// Load a KCT table from binary data
    pub fn load(data: &[u8]) -> Result<Keymap> {
        let mut cursor = Cursor::new(data);

        let header = Self::read_header(&mut cursor)?;

        let mut keymap = Keymap::new();
        keymap.min_key_code = header.min_key_code;
        keymap.max_key_code = header.max_key_code;
        keymap.auto_key_names = header.flags & FLAG_AUTO_KEY_NAMES != 0;
        let name = Self::read_string(&mut cursor)?;
        if header.flags & FLAG_SECTION_NAME != 0 {
            keymap.keycodes_section_name = Some(name);
        }

        keymap.keys = vec![Key::default(); header.max_key_code as usize + 1];
        Self::read_keys(&mut cursor, &header, &mut keymap)?;
        keymap.key_aliases = Self::read_aliases(&mut cursor, header.alias_count as usize)?;
        Self::read_indicators(&mut cursor, header.indicator_count as usize, &mut keymap)?;

        Ok(keymap)
    }

    fn read_header(cursor: &mut Cursor<&[u8]>) -> Result<Header> {
        if cursor.get_ref().len() < HEADER_SIZE {
            return Err(TableError::FileTooSmall(cursor.get_ref().len()));
        }

        let mut magic_code = [0u8; 4];
        cursor.read_exact(&mut magic_code)?;
        if &magic_code != MAGIC {
            return Err(TableError::InvalidMagicCode(magic_code));
        }

        let major = cursor.read_u8()?;
        let minor = cursor.read_u8()?;
        if major != MAJOR_VERSION || minor > MINOR_VERSION {
            return Err(TableError::UnsupportedVersion { major, minor });
        }

        let header = Header {
            min_key_code: cursor.read_u32::<LittleEndian>()?,
            max_key_code: cursor.read_u32::<LittleEndian>()?,
            key_count: cursor.read_u32::<LittleEndian>()?,
            alias_count: cursor.read_u16::<LittleEndian>()?,
            indicator_count: cursor.read_u8()?,
            flags: cursor.read_u8()?,
        };

        if header.max_key_code > KEYCODE_MAX {
            return Err(TableError::TooLarge(header.max_key_code as usize));
        }
        Ok(header)
    }

    fn read_string(cursor: &mut Cursor<&[u8]>) -> Result<String> {
        let length = cursor.read_u16::<LittleEndian>()? as usize;
        let offset = cursor.position() as usize;
        let mut bytes = vec![0u8; length];
        cursor.read_exact(&mut bytes)?;
        String::from_utf8(bytes)
            .map_err(|_| TableError::InvalidUtf8(offset))
    }

    fn read_name(cursor: &mut Cursor<&[u8]>) -> Result<KeyName> {
        let mut bytes = [0u8; 4];
        cursor.read_exact(&mut bytes)?;
        Ok(KeyName::from_bytes(bytes))
    }

    fn read_keys(cursor: &mut Cursor<&[u8]>, header: &Header, keymap: &mut Keymap) -> Result<()> {
        for _ in 0..header.key_count {
            let keycode = cursor.read_u32::<LittleEndian>()?;
            let name = Self::read_name(cursor)?;
            let slot = keymap
                .keys
                .get_mut(keycode as usize)
                .filter(|_| keycode >= header.min_key_code)
                .ok_or(TableError::KeycodeOutOfRange {
                    keycode,
                    min: header.min_key_code,
                    max: header.max_key_code,
                })?;
            slot.name = name;
        }
        Ok(())
    }

    fn read_aliases(cursor: &mut Cursor<&[u8]>, count: usize) -> Result<Vec<KeyAlias>> {
        let mut aliases = Vec::with_capacity(count);

        for _ in 0..count {
            let alias = Self::read_name(cursor)?;
            let real = Self::read_name(cursor)?;
            aliases.push(KeyAlias { alias, real });
        }

        Ok(aliases)
    }

    fn read_indicators(cursor: &mut Cursor<&[u8]>, count: usize, keymap: &mut Keymap) -> Result<()> {
        for _ in 0..count {
            let index = cursor.read_u8()?;
            if index == 0 || index as usize > NUM_INDICATORS {
                return Err(TableError::InvalidIndicator(index));
            }
            keymap.indicator_names[index as usize - 1] = Some(Self::read_string(cursor)?);
        }
        Ok(())
    }
}
