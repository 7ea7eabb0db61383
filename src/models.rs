use serde::{Deserialize, Serialize};

/// A coffee as the random data api describes it. The api sends more
/// fields than these (uid and friends) which we don't care about
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CoffeeRecord {
    pub id: u64,
    pub blend_name: String,
    pub origin: String,
    pub variety: String,
    pub notes: String,
    pub intensifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardImage {
    pub src: String,
    pub caption: String,
}

/// The shape the showcase card component renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: u64,
    pub image: CardImage,
    pub title: String,
    pub extra: String,
    pub desc: String,
    pub tags: String,
}

impl Card {
    pub fn from_record(record: CoffeeRecord, image_src: String) -> Self {
        Self {
            id: record.id,
            title: record.blend_name,
            extra: record.origin,
            desc: record.variety,
            tags: record.notes,
            image: CardImage {
                src: image_src,
                caption: record.intensifier,
            },
        }
    }
}
