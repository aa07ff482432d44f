//! Match offsets - native `regmatch_t` to portable `MatchSpan`
//!
//! `regexec` fills an array of `regmatch_t`, whose offset type (`regoff_t`)
//! is 32-bit on glibc and 64-bit elsewhere. The host always reads
//! `MatchSpan { i64, i64 }`. Both layouts overlay one buffer and the native
//! entries are rewritten in place.

use std::ops::Range;
use std::ptr;

/// Number of offset pairs reported per execute call (group 0 plus 255 groups)
pub const MATCH_COUNT: usize = 256;

/// Portable offset pair
///
/// Byte offsets into the subject; `(-1, -1)` when the group did not take part
/// in the match.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchSpan {
    pub start: i64,
    pub end: i64,
}

impl MatchSpan {
    pub const UNMATCHED: Self = Self { start: -1, end: -1 };

    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn is_matched(&self) -> bool {
        self.start >= 0 && self.end >= self.start
    }

    /// Byte range, `None` for the sentinel
    pub fn range(&self) -> Option<Range<usize>> {
        if self.is_matched() {
            Some(self.start as usize..self.end as usize)
        } else {
            None
        }
    }
}

/// The `MATCH_COUNT` spans produced by one execute call
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSet([MatchSpan; MATCH_COUNT]);

impl MatchSet {
    #[inline]
    pub fn spans(&self) -> &[MatchSpan] {
        &self.0
    }

    /// Span of group `index`, including unmatched sentinels
    #[inline]
    pub fn get(&self, index: usize) -> Option<&MatchSpan> {
        self.0.get(index)
    }

    /// Byte range of group `index` if it participated
    pub fn group(&self, index: usize) -> Option<Range<usize>> {
        self.get(index).and_then(MatchSpan::range)
    }

    /// Substring of `subject` covered by group `index`
    pub fn group_str<'s>(&self, subject: &'s str, index: usize) -> Option<&'s str> {
        self.group(index).and_then(|r| subject.get(r))
    }

    /// Number of leading groups up to and including the last one that matched
    pub fn participating(&self) -> usize {
        self.0
            .iter()
            .rposition(MatchSpan::is_matched)
            .map_or(0, |last| last + 1)
    }

    #[inline]
    pub fn as_ptr(&self) -> *const MatchSpan {
        self.0.as_ptr()
    }
}

// ============================================================================
// Native -> portable conversion
// ============================================================================

/// A native offset pair layout
pub trait NativeSpan: Copy {
    fn start(&self) -> i64;
    fn end(&self) -> i64;
}

impl NativeSpan for libc::regmatch_t {
    #[inline]
    fn start(&self) -> i64 {
        self.rm_so as i64
    }

    #[inline]
    fn end(&self) -> i64 {
        self.rm_eo as i64
    }
}

/// Rewrite `count` native pairs at `base` as `MatchSpan`s, in place
///
/// Entry `i` is read from `base + i * size_of::<N>()` and written to
/// `base + i * size_of::<MatchSpan>()`. When the native entry is narrower the
/// writes land on native entries that have not been read yet, unless the walk
/// runs from the last entry back to the first. When it is the same size or
/// wider, the forward walk never overtakes its reads.
///
/// # Safety
/// - `base` is aligned for both `N` and `MatchSpan`
/// - `base` is valid for reads and writes of
///   `count * max(size_of::<N>(), size_of::<MatchSpan>())` bytes
/// - the first `count` native entries are initialized
pub unsafe fn normalize_in_place<N: NativeSpan>(base: *mut u8, count: usize) {
    let native = std::mem::size_of::<N>();
    let portable = std::mem::size_of::<MatchSpan>();

    let convert = |i: usize| {
        // Load the whole entry before storing; the store may overlap it.
        let entry = ptr::read(base.add(i * native) as *const N);
        ptr::write(
            base.add(i * portable) as *mut MatchSpan,
            MatchSpan::new(entry.start(), entry.end()),
        );
    };

    if native >= portable {
        (0..count).for_each(convert);
    } else {
        (0..count).rev().for_each(convert);
    }
}

#[repr(C)]
union MatchSlots {
    native: [libc::regmatch_t; MATCH_COUNT],
    portable: [MatchSpan; MATCH_COUNT],
}

/// Storage shared by `regexec` output and the `MatchSet` handed out
pub(crate) struct MatchBuffer {
    slots: MatchSlots,
}

impl MatchBuffer {
    pub fn boxed() -> Box<Self> {
        Box::new(Self {
            slots: MatchSlots {
                portable: [MatchSpan::UNMATCHED; MATCH_COUNT],
            },
        })
    }

    /// Destination array for `regexec`
    #[inline]
    pub fn native_mut_ptr(&mut self) -> *mut libc::regmatch_t {
        ptr::addr_of_mut!(self.slots).cast()
    }

    /// Convert what `regexec` wrote into the portable layout
    ///
    /// # Safety
    /// `regexec` must have filled all `MATCH_COUNT` native entries.
    pub unsafe fn normalize(&mut self) {
        normalize_in_place::<libc::regmatch_t>(ptr::addr_of_mut!(self.slots).cast(), MATCH_COUNT);
    }

    pub fn fill_unmatched(&mut self) {
        self.slots.portable = [MatchSpan::UNMATCHED; MATCH_COUNT];
    }

    #[inline]
    pub fn as_set(&self) -> &MatchSet {
        // Every path that hands the set out leaves the slots in portable form.
        unsafe { &*ptr::addr_of!(self.slots).cast::<MatchSet>() }
    }
}
