//! Span-based string arena.
//!
//! Several subsystems (the node tree, the layout scratch space, each draw
//! list) own short-lived string data that is written once, read many
//! times, and thrown away in bulk: node text content, wrapped display
//! lines, draw-command text. `StrArena` bump-allocates that data into
//! fixed-capacity blocks and hands out [`Span`] *indices* instead of
//! references, so a bulk [`reset`](StrArena::reset) cannot leave dangling
//! pointers behind — a stale span simply indexes a new generation.
//!
//! Blocks freed by a reset go to a free pool and are reused by later
//! allocations; strings too large for a block are stored in a side list
//! that is dropped wholesale on reset.

/// Block payload capacity in bytes.
const BLOCK_CAPACITY: usize = 4096;

/// Marker bit in `Span::block` for oversize allocations.
const BIG_BIT: u32 = 1 << 31;

// =============================================================================
// Span
// =============================================================================

/// An index into a [`StrArena`]: which block, where in it, how long.
///
/// Spans are only meaningful against the arena generation they were
/// allocated from; resolving one after a reset is a logic error of the
/// owning subsystem (the tree, layout and draw code never let spans
/// outlive a generation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    block: u32,
    start: u32,
    len: u32,
}

impl Span {
    /// The empty span, valid against any arena.
    pub const EMPTY: Self = Self {
        block: 0,
        start: 0,
        len: 0,
    };

    pub const fn is_empty(self) -> bool {
        self.len == 0
    }
}

// =============================================================================
// StrArena
// =============================================================================

/// Bump allocator for string data with bulk reset.
#[derive(Debug, Default)]
pub struct StrArena {
    /// Blocks holding live allocations; the last one is the bump target.
    used: Vec<String>,
    /// Cleared blocks kept for reuse after a reset.
    free: Vec<String>,
    /// Oversize allocations, one string each.
    big: Vec<String>,
}

impl StrArena {
    pub fn new() -> Self {
        let mut arena = Self::default();
        arena.fresh_block();
        arena
    }

    /// Copy `s` into the arena and return its span.
    pub fn alloc(&mut self, s: &str) -> Span {
        if s.is_empty() {
            return Span::EMPTY;
        }
        if s.len() >= BLOCK_CAPACITY {
            self.big.push(s.to_owned());
            return Span {
                block: BIG_BIT | (self.big.len() as u32 - 1),
                start: 0,
                len: s.len() as u32,
            };
        }

        // Lazily arm the first block so `default()` arenas work too.
        if self.used.is_empty() {
            self.fresh_block();
        }
        if self.used.last().map_or(true, |b| b.len() + s.len() > BLOCK_CAPACITY) {
            self.fresh_block();
        }

        let block = self.used.len() as u32 - 1;
        let current = self.used.last_mut().unwrap();
        let start = current.len() as u32;
        current.push_str(s);
        Span {
            block,
            start,
            len: s.len() as u32,
        }
    }

    /// Resolve a span allocated from this arena generation.
    pub fn get(&self, span: Span) -> &str {
        if span.is_empty() {
            return "";
        }
        if span.block & BIG_BIT != 0 {
            return &self.big[(span.block & !BIG_BIT) as usize];
        }
        let start = span.start as usize;
        &self.used[span.block as usize][start..start + span.len as usize]
    }

    /// Invalidate every span: recycle used blocks into the free pool, drop
    /// oversize allocations, and arm one fresh block so the next `alloc`
    /// doesn't pay for a brand-new one.
    pub fn reset(&mut self) {
        for mut block in self.used.drain(..) {
            block.clear();
            self.free.push(block);
        }
        self.big.clear();
        self.fresh_block();
    }

    fn fresh_block(&mut self) {
        let block = self
            .free
            .pop()
            .unwrap_or_else(|| String::with_capacity(BLOCK_CAPACITY));
        self.used.push(block);
    }
}
