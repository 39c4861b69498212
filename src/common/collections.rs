pub type HashSet<K> = rustc_hash::FxHashSet<K>;
