use crate::errors::{KctError, Result};
use byteorder::{LittleEndian, WriteBytesExt};
use keycodes_core::table::{FLAG_AUTO_KEY_NAMES, FLAG_SECTION_NAME, MAGIC, MAJOR_VERSION, MINOR_VERSION};
use keycodes_core::{KeyName, Keymap};
use std::io::Write;

pub struct KctWriter<W: Write> {
    writer: W,
}

impl<W: Write> KctWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_keymap(mut self, keymap: &Keymap) -> Result<()> {
        let keys: Vec<(u32, KeyName)> = (keymap.min_key_code..=keymap.max_key_code)
            .filter_map(|kc| keymap.key_name(kc).map(|name| (kc, name)))
            .collect();
        let indicators: Vec<(usize, &str)> = keymap
            .indicator_names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| name.as_deref().map(|n| (i + 1, n)))
            .collect();

        let alias_count = u16::try_from(keymap.key_aliases.len())
            .map_err(|_| KctError::BinaryWrite(format!("Too many aliases: {}", keymap.key_aliases.len())))?;

        // Header
        self.writer.write_all(MAGIC)?;
        self.writer.write_u8(MAJOR_VERSION)?;
        self.writer.write_u8(MINOR_VERSION)?;
        self.writer.write_u32::<LittleEndian>(keymap.min_key_code)?;
        self.writer.write_u32::<LittleEndian>(keymap.max_key_code)?;
        self.writer.write_u32::<LittleEndian>(keys.len() as u32)?;
        self.writer.write_u16::<LittleEndian>(alias_count)?;
        self.writer.write_u8(indicators.len() as u8)?;
        let mut flags = 0;
        if keymap.auto_key_names {
            flags |= FLAG_AUTO_KEY_NAMES;
        }
        if keymap.keycodes_section_name.is_some() {
            flags |= FLAG_SECTION_NAME;
        }
        self.writer.write_u8(flags)?;

        self.write_string(keymap.keycodes_section_name.as_deref().unwrap_or(""))?;

        for (keycode, name) in keys {
            self.writer.write_u32::<LittleEndian>(keycode)?;
            self.writer.write_all(&name.to_bytes())?;
        }

        for alias in &keymap.key_aliases {
            self.writer.write_all(&alias.alias.to_bytes())?;
            self.writer.write_all(&alias.real.to_bytes())?;
        }

        for (index, name) in indicators {
            self.writer.write_u8(index as u8)?;
            self.write_string(name)?;
        }

        self.writer.flush()?;
        Ok(())
    }

    fn write_string(&mut self, s: &str) -> Result<()> {
        let length = u16::try_from(s.len())
            .map_err(|_| KctError::BinaryWrite(format!("String too long: {} bytes", s.len())))?;
        self.writer.write_u16::<LittleEndian>(length)?;
        self.writer.write_all(s.as_bytes())?;
        Ok(())
    }
}
