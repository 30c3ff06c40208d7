use doodleboard_shared::{sort_newest_first, DrawingRecord};

pub const PAGE_SIZE: usize = 9;
pub const GRID_COLUMNS: usize = 3;

/// Saved drawings, newest first, viewed one page at a time.
#[derive(Default)]
pub struct Gallery {
    records: Vec<DrawingRecord>,
    page: usize,
}

impl Gallery {
    pub fn replace(&mut self, mut records: Vec<DrawingRecord>) {
        sort_newest_first(&mut records);
        self.records = records;
        self.page = 0;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.records.len().div_ceil(PAGE_SIZE)
    }

    pub fn page_items(&self) -> &[DrawingRecord] {
        let start = (self.page * PAGE_SIZE).min(self.records.len());
        let end = (start + PAGE_SIZE).min(self.records.len());
        &self.records[start..end]
    }

    /// Cells needed to keep the grid at full size on a short last page.
    pub fn empty_slots(&self) -> usize {
        PAGE_SIZE - self.page_items().len()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages()
    }

    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.page -= 1;
        true
    }
}

pub fn card_title(record: &DrawingRecord) -> &str {
    let title = record.title.trim();
    if title.is_empty() {
        "Untitled"
    } else {
        title
    }
}

pub fn card_byline(record: &DrawingRecord) -> Option<String> {
    let author = record.author.as_deref()?.trim();
    if author.is_empty() {
        None
    } else {
        Some(format!("by {author}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: u64) -> DrawingRecord {
        DrawingRecord {
            id: format!("id-{index:02}"),
            image: "data:image/png;base64,AAAA".to_string(),
            title: format!("drawing {index}"),
            author: None,
            created_at: 1_000 + index,
        }
    }

    fn gallery_of(count: u64) -> Gallery {
        let mut gallery = Gallery::default();
        gallery.replace((0..count).map(record).collect());
        gallery
    }

    #[test]
    fn ten_records_split_nine_and_one() {
        let mut gallery = gallery_of(10);
        assert_eq!(gallery.total_pages(), 2);
        assert_eq!(gallery.page_items().len(), 9);
        assert_eq!(gallery.empty_slots(), 0);
        assert!(gallery.next());
        assert_eq!(gallery.page_items().len(), 1);
        assert_eq!(gallery.empty_slots(), 8);
        assert_eq!(gallery.page_items()[0].id, "id-00");
    }

    #[test]
    fn first_page_shows_newest() {
        let gallery = gallery_of(4);
        let ids: Vec<_> = gallery.page_items().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["id-03", "id-02", "id-01", "id-00"]);
    }

    #[test]
    fn navigation_is_clamped() {
        let mut gallery = gallery_of(10);
        assert!(!gallery.has_prev());
        assert!(!gallery.prev());
        assert!(gallery.next());
        assert!(!gallery.has_next());
        assert!(!gallery.next());
        assert_eq!(gallery.page(), 1);
        assert!(gallery.prev());
        assert_eq!(gallery.page(), 0);
    }

    #[test]
    fn empty_gallery_has_no_pages() {
        let mut gallery = Gallery::default();
        assert_eq!(gallery.total_pages(), 0);
        assert!(gallery.page_items().is_empty());
        assert_eq!(gallery.empty_slots(), PAGE_SIZE);
        assert!(!gallery.next());
    }

    #[test]
    fn replacing_returns_to_the_first_page() {
        let mut gallery = gallery_of(20);
        gallery.next();
        gallery.next();
        gallery.replace((0..3).map(record).collect());
        assert_eq!(gallery.page(), 0);
        assert_eq!(gallery.len(), 3);
    }

    #[test]
    fn card_text_falls_back_for_blank_fields() {
        let mut untitled = record(1);
        untitled.title = "  ".to_string();
        untitled.author = Some(" ".to_string());
        assert_eq!(card_title(&untitled), "Untitled");
        assert_eq!(card_byline(&untitled), None);

        let mut signed = record(2);
        signed.author = Some("Ada".to_string());
        assert_eq!(card_title(&signed), "drawing 2");
        assert_eq!(card_byline(&signed).as_deref(), Some("by Ada"));
    }
}
