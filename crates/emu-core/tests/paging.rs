//! Unit tests for the paged bus: routing, permissions, and layers.

use emu_core::{
    BusAccess, DeviceId, LayerId, MapError, MemorySlice, PageEntry, PagePerms, PageRead, PageTable,
    PhysicalMemory, FLOATING_BUS, PAGE_SIZE,
};

const DEV: DeviceId = DeviceId(1);

/// A table with 2 KiB of RAM at $0000 and 1 KiB of ROM at $D000.
fn small_machine() -> PageTable {
    let mut pages = PageTable::new();
    let ram = pages.add_memory(PhysicalMemory::new("main", 2048));
    let mut rom_image = PhysicalMemory::with_contents("rom", vec![0xEA; 1024]);
    rom_image.load(0, &[0x11, 0x22, 0x33]);
    let rom = pages.add_memory(rom_image);
    pages
        .map_ram(0x00, 8, DEV, PagePerms::RWX, ram, 0)
        .expect("ram mapping");
    pages
        .map_rom(0xD0, 4, DEV, rom, 0)
        .expect("rom mapping");
    pages
}

fn read(pages: &PageTable, addr: u16) -> u8 {
    match pages.read(BusAccess::data_read(addr)) {
        PageRead::Value(v) => v,
        PageRead::Io { .. } => panic!("unexpected I/O routing for {addr:#06x}"),
    }
}

#[test]
fn unmapped_reads_float_and_writes_vanish() {
    let mut pages = small_machine();
    assert_eq!(read(&pages, 0x8000), FLOATING_BUS, "unmapped read floats");
    pages.write(BusAccess::data_write(0x8000), 0x42);
    assert_eq!(
        read(&pages, 0x8000),
        FLOATING_BUS,
        "unmapped write is not observable"
    );
}

#[test]
fn ram_round_trips() {
    let mut pages = small_machine();
    pages.write(BusAccess::data_write(0x0123), 0x5A);
    assert_eq!(read(&pages, 0x0123), 0x5A);
}

#[test]
fn rom_drops_normal_writes_but_honours_debug_writes() {
    let mut pages = small_machine();
    assert_eq!(read(&pages, 0xD001), 0x22);

    pages.write(BusAccess::data_write(0xD001), 0x99);
    assert_eq!(read(&pages, 0xD001), 0x22, "normal ROM write dropped");

    pages.write(BusAccess::debug_write(0xD001), 0x99);
    assert_eq!(read(&pages, 0xD001), 0x99, "debug write patches ROM");
}

#[test]
fn write_permission_is_enforced_per_page() {
    let mut pages = PageTable::new();
    let ram = pages.add_memory(PhysicalMemory::new("main", 512));
    pages
        .map_ram(0x00, 2, DEV, PagePerms::RX, ram, 0)
        .expect("read-only ram");

    pages.write(BusAccess::data_write(0x0010), 0x42);
    assert_eq!(read(&pages, 0x0010), 0x00, "write without W perm dropped");

    pages.write(BusAccess::debug_write(0x0010), 0x42);
    assert_eq!(read(&pages, 0x0010), 0x42, "debug write bypasses W perm");
}

#[test]
fn layer_overrides_base_and_pops_cleanly() {
    let mut pages = small_machine();
    let alt = pages.add_memory(PhysicalMemory::with_contents("alt", vec![0xAB; 256]));
    let layer = LayerId("test-overlay");

    let entry = PageEntry::ram(MemorySlice::new(alt, 0, PAGE_SIZE), PagePerms::RWX, DEV);
    pages.push_layer(layer, vec![(0x02, entry)]).expect("push");

    assert_eq!(read(&pages, 0x0200), 0xAB, "layer wins over base");
    assert_eq!(read(&pages, 0x0100), 0x00, "other pages unaffected");

    assert!(pages.pop_layer(layer));
    assert_eq!(read(&pages, 0x0200), 0x00, "base visible again after pop");
    assert!(!pages.pop_layer(layer), "second pop is a no-op");
}

#[test]
fn topmost_layer_wins() {
    let mut pages = small_machine();
    let a = pages.add_memory(PhysicalMemory::with_contents("a", vec![0x01; 256]));
    let b = pages.add_memory(PhysicalMemory::with_contents("b", vec![0x02; 256]));

    let entry_a = PageEntry::ram(MemorySlice::new(a, 0, PAGE_SIZE), PagePerms::RWX, DEV);
    let entry_b = PageEntry::ram(MemorySlice::new(b, 0, PAGE_SIZE), PagePerms::RWX, DEV);
    pages
        .push_layer(LayerId("lower"), vec![(0x03, entry_a)])
        .expect("push lower");
    pages
        .push_layer(LayerId("upper"), vec![(0x03, entry_b)])
        .expect("push upper");

    assert_eq!(read(&pages, 0x0300), 0x02);
    pages.pop_layer(LayerId("upper"));
    assert_eq!(read(&pages, 0x0300), 0x01);
}

#[test]
fn read_and_write_decode_independently() {
    // A write-only layer steers stores into alternate RAM while reads still
    // see the base mapping — the Language Card bus arrangement.
    let mut pages = small_machine();
    let alt = pages.add_memory(PhysicalMemory::new("alt", 256));

    let write_entry = PageEntry::ram(
        MemorySlice::new(alt, 0, PAGE_SIZE),
        PagePerms::WRITE_ONLY,
        DEV,
    );
    pages
        .push_layer(LayerId("write-only"), vec![(0x01, write_entry)])
        .expect("push");

    pages.write(BusAccess::data_write(0x0150), 0x77);
    assert_eq!(read(&pages, 0x0150), 0x00, "read still hits base RAM");
    assert_eq!(
        pages.memory(alt).bytes()[0x50],
        0x77,
        "write landed in the alternate bank"
    );
}

#[test]
fn mapping_rejects_out_of_bounds_slices() {
    let mut pages = PageTable::new();
    let ram = pages.add_memory(PhysicalMemory::new("tiny", 256));
    let err = pages
        .map_ram(0x00, 2, DEV, PagePerms::RWX, ram, 0)
        .expect_err("two pages cannot fit in 256 bytes");
    assert!(matches!(err, MapError::SliceOutOfBounds { .. }));
}

#[test]
fn mapping_rejects_duplicate_layer_ids() {
    let mut pages = small_machine();
    let alt = pages.add_memory(PhysicalMemory::new("alt", 256));
    let entry = PageEntry::ram(MemorySlice::new(alt, 0, PAGE_SIZE), PagePerms::RWX, DEV);

    pages
        .push_layer(LayerId("dup"), vec![(0x04, entry)])
        .expect("first push");
    let err = pages
        .push_layer(LayerId("dup"), vec![(0x05, entry)])
        .expect_err("duplicate id");
    assert!(matches!(err, MapError::DuplicateLayer(_)));
}

#[test]
fn replace_layer_moves_it_to_the_top() {
    let mut pages = small_machine();
    let a = pages.add_memory(PhysicalMemory::with_contents("a", vec![0x01; 256]));
    let b = pages.add_memory(PhysicalMemory::with_contents("b", vec![0x02; 256]));

    let entry_a = PageEntry::ram(MemorySlice::new(a, 0, PAGE_SIZE), PagePerms::RWX, DEV);
    let entry_b = PageEntry::ram(MemorySlice::new(b, 0, PAGE_SIZE), PagePerms::RWX, DEV);

    pages
        .push_layer(LayerId("first"), vec![(0x03, entry_a)])
        .expect("push first");
    pages
        .push_layer(LayerId("second"), vec![(0x03, entry_b)])
        .expect("push second");
    pages
        .replace_layer(LayerId("first"), vec![(0x03, entry_a)])
        .expect("republish");

    assert_eq!(read(&pages, 0x0300), 0x01, "republished layer is topmost");
}
