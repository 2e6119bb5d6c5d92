//! Sparse byte-addressable memory
//!
//! The full 32-bit address space is backed by a page table that realizes a
//! page on first non-zero write. Multi-byte values are little-endian and are
//! composed from consecutive bytes, so accesses may be unaligned and may
//! straddle pages or wrap past `0xFFFF_FFFF`.

use std::collections::HashMap;

/// Page size in bytes
pub const PAGE_SIZE: usize = 4096;

const PAGE_SHIFT: u32 = 12;
const OFFSET_MASK: u32 = (PAGE_SIZE as u32) - 1;

type Page = Box<[u8; PAGE_SIZE]>;

#[derive(Debug, Clone, Default)]
pub struct Memory {
    pages: HashMap<u32, Page>,
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            pages: HashMap::new(),
        }
    }

    /// Drop every page; all addresses read as zero again
    pub fn clear(&mut self) {
        self.pages.clear();
    }

    /// Number of realized pages
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    #[inline]
    pub fn load_byte(&self, addr: u32) -> u8 {
        self.pages
            .get(&(addr >> PAGE_SHIFT))
            .map_or(0, |page| page[(addr & OFFSET_MASK) as usize])
    }

    #[inline]
    pub fn store_byte(&mut self, addr: u32, value: u8) {
        let key = addr >> PAGE_SHIFT;
        let offset = (addr & OFFSET_MASK) as usize;
        match self.pages.get_mut(&key) {
            Some(page) => page[offset] = value,
            None if value == 0 => {}
            None => {
                let mut page: Page = Box::new([0; PAGE_SIZE]);
                page[offset] = value;
                self.pages.insert(key, page);
            }
        }
    }

    fn load_le<const N: usize>(&self, addr: u32) -> [u8; N] {
        let mut bytes = [0u8; N];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = self.load_byte(addr.wrapping_add(i as u32));
        }
        bytes
    }

    fn store_le(&mut self, addr: u32, bytes: &[u8]) {
        for (i, &byte) in bytes.iter().enumerate() {
            self.store_byte(addr.wrapping_add(i as u32), byte);
        }
    }

    pub fn load_half(&self, addr: u32) -> u16 {
        u16::from_le_bytes(self.load_le(addr))
    }

    pub fn store_half(&mut self, addr: u32, value: u16) {
        self.store_le(addr, &value.to_le_bytes());
    }

    pub fn load_word(&self, addr: u32) -> u32 {
        u32::from_le_bytes(self.load_le(addr))
    }

    pub fn store_word(&mut self, addr: u32, value: u32) {
        self.store_le(addr, &value.to_le_bytes());
    }

    pub fn load_float(&self, addr: u32) -> f64 {
        f64::from_le_bytes(self.load_le(addr))
    }

    pub fn store_float(&mut self, addr: u32, value: f64) {
        self.store_le(addr, &value.to_le_bytes());
    }

    /// Copy a byte sequence into memory starting at `base`
    pub fn write_bytes(&mut self, base: u32, bytes: &[u8]) {
        self.store_le(base, bytes);
    }

    /// Read `len` consecutive bytes starting at `base`
    pub fn read_bytes(&self, base: u32, len: usize) -> Vec<u8> {
        (0..len)
            .map(|i| self.load_byte(base.wrapping_add(i as u32)))
            .collect()
    }

    /// Pages holding at least one non-zero byte, as (base address, contents),
    /// ordered by address
    ///
    /// A page zeroed after realization reads the same as an absent one and is
    /// left out.
    pub fn pages(&self) -> Vec<(u32, Vec<u8>)> {
        let mut pages: Vec<(u32, Vec<u8>)> = self
            .pages
            .iter()
            .filter(|(_, page)| page.iter().any(|&b| b != 0))
            .map(|(&key, page)| (key << PAGE_SHIFT, page.to_vec()))
            .collect();
        pages.sort_by_key(|(base, _)| *base);
        pages
    }

    /// Rebuild memory from pages produced by [`pages`](Self::pages)
    ///
    /// Bases need not be page-aligned; contents are written byte by byte.
    pub fn from_pages<I>(pages: I) -> Self
    where
        I: IntoIterator<Item = (u32, Vec<u8>)>,
    {
        let mut memory = Memory::new();
        for (base, bytes) in pages {
            memory.write_bytes(base, &bytes);
        }
        memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritten_reads_zero() {
        let mem = Memory::new();
        assert_eq!(mem.load_byte(0xDEAD_BEEF), 0);
        assert_eq!(mem.load_word(0x1234), 0);
        assert_eq!(mem.load_float(0x8000), 0.0);
        assert_eq!(mem.page_count(), 0);
    }

    #[test]
    fn test_word_little_endian() {
        let mut mem = Memory::new();
        mem.store_word(0x100, 0x1122_3344);
        assert_eq!(mem.load_byte(0x100), 0x44);
        assert_eq!(mem.load_byte(0x101), 0x33);
        assert_eq!(mem.load_byte(0x102), 0x22);
        assert_eq!(mem.load_byte(0x103), 0x11);
        assert_eq!(mem.load_half(0x100), 0x3344);
        assert_eq!(mem.load_half(0x102), 0x1122);
        assert_eq!(mem.load_byte(0x0FF), 0);
        assert_eq!(mem.load_byte(0x104), 0);
    }

    #[test]
    fn test_unaligned_access() {
        let mut mem = Memory::new();
        mem.store_word(0x101, 0xAABB_CCDD);
        assert_eq!(mem.load_word(0x101), 0xAABB_CCDD);
        assert_eq!(mem.load_word(0x100), 0xBBCC_DD00);
    }

    #[test]
    fn test_page_straddle() {
        let mut mem = Memory::new();
        mem.store_float(0x0FFC, -1.25);
        assert_eq!(mem.load_float(0x0FFC), -1.25);
        assert_eq!(mem.page_count(), 2);
    }

    #[test]
    fn test_address_wraps() {
        let mut mem = Memory::new();
        mem.store_word(0xFFFF_FFFE, 0x0403_0201);
        assert_eq!(mem.load_byte(0xFFFF_FFFE), 0x01);
        assert_eq!(mem.load_byte(0xFFFF_FFFF), 0x02);
        assert_eq!(mem.load_byte(0x0000_0000), 0x03);
        assert_eq!(mem.load_byte(0x0000_0001), 0x04);
        assert_eq!(mem.load_word(0xFFFF_FFFE), 0x0403_0201);
    }

    #[test]
    fn test_zero_store_does_not_allocate() {
        let mut mem = Memory::new();
        mem.store_word(0x5000, 0);
        assert_eq!(mem.page_count(), 0);
    }

    #[test]
    fn test_truncating_stores() {
        let mut mem = Memory::new();
        mem.store_word(0x10, 0xFFFF_FFFF);
        mem.store_half(0x10, 0x1234);
        mem.store_byte(0x12, 0x56);
        assert_eq!(mem.load_word(0x10), 0xFF56_1234);
    }

    #[test]
    fn test_bytes_and_pages() {
        let mut mem = Memory::new();
        mem.write_bytes(0x2000, b"hello");
        mem.store_byte(0x10, 7);
        assert_eq!(mem.read_bytes(0x2000, 5), b"hello");

        let pages = mem.pages();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].0, 0x0000);
        assert_eq!(pages[1].0, 0x2000);

        let copy = Memory::from_pages(pages);
        assert_eq!(copy.read_bytes(0x2000, 5), b"hello");
        assert_eq!(copy.load_byte(0x10), 7);
    }

    #[test]
    fn test_zeroed_page_not_exported() {
        let mut mem = Memory::new();
        mem.store_word(0x8000, 7);
        mem.store_word(0x8000, 0);
        mem.store_byte(0x30, 1);
        assert_eq!(mem.page_count(), 2);

        let pages = mem.pages();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].0, 0x0000);
        assert_eq!(Memory::from_pages(pages.clone()).pages(), pages);
    }

    #[test]
    fn test_clear() {
        let mut mem = Memory::new();
        mem.store_word(0x40, 9);
        mem.clear();
        assert_eq!(mem.load_word(0x40), 0);
        assert_eq!(mem.page_count(), 0);
    }
}
