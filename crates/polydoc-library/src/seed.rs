use polydoc_codec::Tree;
use serde_json::json;

/// Root key of the seed document.
pub const SEED_ROOT: &str = "library";

/// The document written on first start in library mode.
///
/// One open borrow holding batch 10 with three books and one student.
pub fn seed_document() -> Tree {
    let newport = json!({"aut_id": 1, "aut_firstname": "Cal", "aut_lastname": "Newport"});
    json!({
        SEED_ROOT: {
            "borrow": {
                "borrow_id": 1,
                "borrow_date": "2024-01-15",
                "borrow_bookbatch": [{
                    "batch_id": 10,
                    "batch_books": {
                        "books": [
                            {
                                "book_id": 1001,
                                "book_title": "Deep Work",
                                "book_authors": [{"Authors": [newport.clone()]}]
                            },
                            {
                                "book_id": 1002,
                                "book_title": "Digital Minimalism",
                                "book_authors": [{"Authors": [newport]}]
                            },
                            {
                                "book_id": 1003,
                                "book_title": "Atomic Habits",
                                "book_authors": [{"Authors": [
                                    {"aut_id": 2, "aut_firstname": "James", "aut_lastname": "Clear"}
                                ]}]
                            }
                        ]
                    },
                    "batch_studentid": {
                        "Student": [
                            {"stu_id": 501, "stu_firstname": "Maria", "stu_lastname": "Santos"}
                        ]
                    }
                }]
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Projections;
    use crate::shape::sequence_schema;
    use polydoc_codec::{Codec, Encoding};

    #[test]
    fn seed_has_one_batch_of_three_books() {
        let seed = seed_document();
        let batch = Projections::get_batch(&seed, 10).unwrap();
        assert_eq!(batch.books.len(), 3);
        assert_eq!(batch.student["stu_id"], 501);
        assert_eq!(Projections::list_all_authors(&seed).unwrap().len(), 2);
    }

    #[test]
    fn seed_survives_every_encoding() {
        for encoding in [Encoding::Json, Encoding::Yaml, Encoding::Xml] {
            let codec = Codec::new(encoding).with_schema(sequence_schema());
            let bytes = codec.encode(&seed_document()).unwrap();
            assert_eq!(codec.decode(&bytes).unwrap(), seed_document(), "{encoding}");
        }
    }
}
