//! Primary photo selection.

use super::records::PhotoId;

/// The part of a photo row primary selection looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimaryCandidate {
    pub id: PhotoId,
    pub is_primary: bool,
}

/// Pick the photo that must end up as the sole primary.
///
/// In order of precedence:
///
/// 1. `requested`, when it is one of `photos`;
/// 2. an already flagged photo, the highest id winning if several are flagged;
/// 3. the lowest id.
///
/// Returns `None` only when `photos` is empty.
pub fn choose_primary(photos: &[PrimaryCandidate], requested: Option<PhotoId>) -> Option<PhotoId> {
    if let Some(requested) = requested
        && photos.iter().any(|photo| photo.id == requested)
    {
        return Some(requested);
    }

    photos
        .iter()
        .filter(|photo| photo.is_primary)
        .map(|photo| photo.id)
        .max()
        .or_else(|| photos.iter().map(|photo| photo.id).min())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: i64, is_primary: bool) -> PrimaryCandidate {
        PrimaryCandidate {
            id: PhotoId::from_i64(id),
            is_primary,
        }
    }

    fn id(id: i64) -> Option<PhotoId> {
        Some(PhotoId::from_i64(id))
    }

    #[test]
    fn no_photos_means_no_primary() {
        assert_eq!(choose_primary(&[], id(1)), None);
        assert_eq!(choose_primary(&[], None), None);
    }

    #[test]
    fn requested_photo_of_the_car_wins() {
        let photos = [candidate(1, true), candidate(2, false), candidate(3, false)];

        assert_eq!(choose_primary(&photos, id(3)), id(3));
    }

    #[test]
    fn foreign_request_falls_through_to_flagged_photo() {
        let photos = [candidate(4, false), candidate(5, true)];

        assert_eq!(choose_primary(&photos, id(99)), id(5));
    }

    #[test]
    fn highest_flagged_id_wins_among_several() {
        let photos = [candidate(1, true), candidate(2, false), candidate(3, true)];

        assert_eq!(choose_primary(&photos, None), id(3));
    }

    #[test]
    fn lowest_id_when_nothing_is_flagged() {
        let photos = [candidate(9, false), candidate(7, false), candidate(8, false)];

        assert_eq!(choose_primary(&photos, None), id(7));
    }

    /// In-memory photo set applying the same steps as the lifecycle.
    #[derive(Default)]
    struct Gallery {
        next_id: i64,
        photos: Vec<PrimaryCandidate>,
    }

    impl Gallery {
        fn attach(&mut self, count: usize, primary_index: Option<usize>) -> Vec<PhotoId> {
            let primary_index = primary_index.map(|index| index.min(count.saturating_sub(1)));

            (0..count)
                .map(|index| {
                    self.next_id += 1;
                    let photo = candidate(self.next_id, primary_index == Some(index));
                    self.photos.push(photo);

                    photo.id
                })
                .collect()
        }

        fn remove(&mut self, ids: &[PhotoId]) {
            self.photos.retain(|photo| !ids.contains(&photo.id));
        }

        fn resolve(&mut self, requested: Option<PhotoId>) -> Option<PhotoId> {
            let chosen = choose_primary(&self.photos, requested);

            for photo in &mut self.photos {
                photo.is_primary = Some(photo.id) == chosen;
            }

            chosen
        }

        fn primaries(&self) -> usize {
            self.photos.iter().filter(|photo| photo.is_primary).count()
        }
    }

    #[test]
    fn single_primary_holds_across_write_sequences() {
        let mut gallery = Gallery::default();

        let created = gallery.attach(3, Some(7));
        gallery.resolve(None);

        assert_eq!(gallery.primaries(), 1);
        assert_eq!(created.get(2).copied(), gallery.resolve(None));

        let added = gallery.attach(2, None);
        gallery.resolve(added.first().copied());

        assert_eq!(gallery.primaries(), 1);
        assert_eq!(added.first().copied(), gallery.resolve(None));

        gallery.remove(&added);
        let chosen = gallery.resolve(None);

        assert_eq!(gallery.primaries(), 1);
        assert_eq!(chosen, created.first().copied());

        gallery.remove(&created);

        assert_eq!(gallery.resolve(None), None);
        assert_eq!(gallery.primaries(), 0);
    }

    #[test]
    fn removing_the_primary_promotes_the_lowest_remaining_id() {
        let photos = [candidate(10, true), candidate(11, false), candidate(12, false)];

        let remaining: Vec<_> = photos
            .iter()
            .copied()
            .filter(|photo| photo.id != PhotoId::from_i64(10))
            .collect();

        assert_eq!(choose_primary(&remaining, None), id(11));
    }
}
