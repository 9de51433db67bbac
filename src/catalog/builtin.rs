//! Built-in best-seller category table

/// `(id, name, slug)` for every top-level category
pub(super) const CATEGORIES: &[(u8, &str, &str)] = &[
    (1, "Appliances", "appliances"),
    (2, "Apps & Games", "mobile-apps"),
    (3, "Arts, Crafts & Sewing", "arts-crafts"),
    (4, "Automotive", "automotive"),
    (5, "Baby", "baby-products"),
    (6, "Beauty & Personal Care", "beauty"),
    (7, "Books", "books"),
    (8, "CDs & Vinyl", "music"),
    (9, "Camera & Photo", "photo"),
    (10, "Cell Phones & Accessories", "wireless"),
    (11, "Clothing, Shoes & Jewelry", "fashion"),
    (12, "Collectible Coins", "coins"),
    (13, "Computers & Accessories", "pc"),
    (14, "Digital Music", "dmusic"),
    (15, "Electronics", "electronics"),
    (16, "Entertainment Collectibles", "entertainment-collectibles"),
    (17, "Gift Cards", "gift-cards"),
    (18, "Grocery & Gourmet Food", "grocery"),
    (19, "Health & Household", "hpc"),
    (20, "Home & Kitchen", "home-garden"),
    (21, "Industrial & Scientific", "industrial"),
    (22, "Kindle Store", "digital-text"),
    (23, "Kitchen & Dining", "kitchen"),
    (24, "Magazine Subscriptions", "magazines"),
    (25, "Movies & TV", "movies-tv"),
    (26, "Musical Instruments", "musical-instruments"),
    (27, "Office Products", "office-products"),
    (28, "Patio, Lawn & Garden", "lawn-garden"),
    (29, "Pet Supplies", "pet-supplies"),
    (30, "Prime Pantry", "pantry"),
    (31, "Software", "software"),
    (32, "Sports & Outdoors", "sporting-goods"),
    (33, "Sports Collectibles", "sports-collectibles"),
    (34, "Tools & Home Improvement", "hi"),
    (35, "Toys & Games", "toys-and-games"),
    (36, "Video Games", "videogames"),
];

/// `(parent id, subcategory id, slug)` for the known subcategory listings
///
/// More can be attached through the `[[catalog.subcategory]]` config section.
pub(super) const SUBCATEGORIES: &[(u8, u64, &str)] =
    &[(1, 3741261, "Best-Sellers-Appliances-Cooktops")];
