//! Static per-category material catalog

use crate::material::Material;
use crate::types::Category;
use serde::{Deserialize, Serialize};

/// Ordered materials offered for each surface category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCatalog {
    #[serde(default)]
    pub wall: Vec<Material>,
    #[serde(default)]
    pub floor: Vec<Material>,
    #[serde(default)]
    pub ceiling: Vec<Material>,
}

impl Default for MaterialCatalog {
    fn default() -> Self {
        Self {
            wall: vec![
                Material::color("wall-paint", "화이트 도장", "#FAFAFA"),
                Material::texture("wall-plaster", "석고보드 (Plaster)", "/textures/plasterboard.png"),
                Material::texture("wall-brick", "붉은 벽돌 (Brick)", "/textures/brick.png"),
                Material::texture("wall-panel", "우드 패널 (Panel)", "/textures/panel.png"),
                Material::texture("wall-concrete", "콘크리트 (Concrete)", "/textures/concrete.png"),
            ],
            floor: vec![
                Material::texture("floor-oak", "오크 원목 (Wood)", "/textures/wood.png"),
                Material::texture("floor-concrete", "콘크리트 (Concrete)", "/textures/concrete.png"),
                Material::color("tile-gray", "그레이 타일", "#B0B5B9"),
            ],
            ceiling: vec![
                Material::color("ceiling-white", "화이트 천장지", "#FFFFFF"),
                Material::texture("ceiling-concrete", "콘크리트", "/textures/concrete.png"),
                Material::texture("ceiling-wood", "우드 패널", "/textures/panel.png"),
            ],
        }
    }
}

impl MaterialCatalog {
    /// Catalog with no materials in any category
    pub fn empty() -> Self {
        Self {
            wall: Vec::new(),
            floor: Vec::new(),
            ceiling: Vec::new(),
        }
    }

    pub fn materials(&self, category: Category) -> &[Material] {
        match category {
            Category::Wall => &self.wall,
            Category::Floor => &self.floor,
            Category::Ceiling => &self.ceiling,
        }
    }

    pub fn find(&self, category: Category, id: &str) -> Option<&Material> {
        self.materials(category).iter().find(|m| m.id == id)
    }

    /// Whether `material` is offered, unchanged, for `category`
    pub fn contains(&self, category: Category, material: &Material) -> bool {
        self.find(category, &material.id)
            .map(|m| m == material)
            .unwrap_or(false)
    }

    /// Every distinct texture reference, in catalog order (wall, floor, ceiling)
    pub fn unique_texture_refs(&self) -> Vec<String> {
        let mut refs: Vec<String> = Vec::new();
        for category in Category::ALL {
            for image in self.materials(category).iter().filter_map(|m| m.texture_ref()) {
                if !refs.iter().any(|r| r == image) {
                    refs.push(image.to_string());
                }
            }
        }
        refs
    }

    pub fn len(&self) -> usize {
        self.wall.len() + self.floor.len() + self.ceiling.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_sizes() {
        let catalog = MaterialCatalog::default();
        assert_eq!(catalog.materials(Category::Wall).len(), 5);
        assert_eq!(catalog.materials(Category::Floor).len(), 3);
        assert_eq!(catalog.materials(Category::Ceiling).len(), 3);
        assert_eq!(catalog.len(), 11);
    }

    #[test]
    fn test_find_is_category_scoped() {
        let catalog = MaterialCatalog::default();
        assert!(catalog.find(Category::Wall, "wall-brick").is_some());
        assert!(catalog.find(Category::Floor, "wall-brick").is_none());
    }

    #[test]
    fn test_contains_requires_identical_material() {
        let catalog = MaterialCatalog::default();
        let brick = catalog.find(Category::Wall, "wall-brick").unwrap().clone();
        assert!(catalog.contains(Category::Wall, &brick));
        assert!(!catalog.contains(Category::Ceiling, &brick));

        let mut forged = brick.clone();
        forged.name = "Something else".to_string();
        assert!(!catalog.contains(Category::Wall, &forged));
    }

    #[test]
    fn test_unique_texture_refs() {
        let refs = MaterialCatalog::default().unique_texture_refs();
        assert_eq!(
            refs,
            vec![
                "/textures/plasterboard.png",
                "/textures/brick.png",
                "/textures/panel.png",
                "/textures/concrete.png",
                "/textures/wood.png",
            ]
        );
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = MaterialCatalog::empty();
        assert!(catalog.is_empty());
        assert!(catalog.unique_texture_refs().is_empty());
    }
}
