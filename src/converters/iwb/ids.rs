use uuid::Uuid;

/// Source of the ids given to SVG elements and relocated files.
///
/// Random ids are collision-free across documents; sequential ids make the
/// output reproducible and are unique within one document.
#[derive(Debug, Clone)]
pub enum IdGenerator {
    Random,
    Sequential { prefix: String, next: u64 },
}

impl IdGenerator {
    pub fn random() -> Self {
        IdGenerator::Random
    }

    pub fn sequential(prefix: impl Into<String>) -> Self {
        IdGenerator::Sequential {
            prefix: prefix.into(),
            next: 1,
        }
    }

    pub fn next_id(&mut self) -> String {
        match self {
            IdGenerator::Random => Uuid::new_v4().to_string(),
            IdGenerator::Sequential { prefix, next } => {
                let id = format!("{}{:04}", prefix, next);
                *next += 1;
                id
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sequential_ids_are_ordered_and_prefixed() {
        let mut ids = IdGenerator::sequential("id-");
        assert_eq!(ids.next_id(), "id-0001");
        assert_eq!(ids.next_id(), "id-0002");
    }

    #[test]
    fn random_ids_do_not_collide() {
        let mut ids = IdGenerator::random();
        let generated: HashSet<String> = (0..100).map(|_| ids.next_id()).collect();
        assert_eq!(generated.len(), 100);
    }
}
