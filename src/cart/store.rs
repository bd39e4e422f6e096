use super::{Cart, CartResult};
use std::collections::HashMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// 购物车在存储中使用的固定键
pub const CART_KEY: &str = "cart";

/// 字符串键值存储
pub trait CartStore {
    fn get(&self, key: &str) -> CartResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> CartResult<()>;
    fn remove(&self, key: &str) -> CartResult<()>;
}

/// 每个键对应目录下的一个 `<key>.json` 文件
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl AsRef<Path>) -> CartResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CartStore for JsonFileStore {
    fn get(&self, key: &str) -> CartResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 先写临时文件再重命名, 读者不会看到写了一半的内容
    fn set(&self, key: &str, value: &str) -> CartResult<()> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> CartResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> CartResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| io::Error::other("cart store lock poisoned").into())
    }
}

impl CartStore for MemoryStore {
    fn get(&self, key: &str) -> CartResult<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CartResult<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CartResult<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// 购物车的加载/保存点
pub struct CartRepository<S: CartStore> {
    store: S,
}

impl<S: CartStore> CartRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 没有保存过或内容损坏时返回空购物车
    pub fn load(&self) -> CartResult<Cart> {
        let Some(raw) = self.store.get(CART_KEY)? else {
            return Ok(Cart::new());
        };
        match serde_json::from_str(&raw) {
            Ok(cart) => Ok(cart),
            Err(e) => {
                log::warn!("discarding unreadable saved cart: {e}");
                Ok(Cart::new())
            }
        }
    }

    /// 空购物车直接删除存储项
    pub fn save(&self, cart: &Cart) -> CartResult<()> {
        if cart.is_empty() {
            return self.store.remove(CART_KEY);
        }
        let raw = serde_json::to_string(cart)?;
        self.store.set(CART_KEY, &raw)
    }

    pub fn clear(&self) -> CartResult<()> {
        self.store.remove(CART_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;
    use rust_decimal::Decimal;

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(3, CartItem::new(1, "Margherita", Decimal::new(1299, 2), 2))
            .unwrap();
        cart.add_item(
            3,
            CartItem::new(2, "Caesar Salad", Decimal::new(902, 2), 1).with_instructions("no croutons"),
        )
        .unwrap();
        cart
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        let repo = CartRepository::new(JsonFileStore::new(dir.path()).unwrap());
        repo.save(&sample_cart()).unwrap();
        assert!(dir.path().join("cart.json").exists());

        let reopened = CartRepository::new(JsonFileStore::new(dir.path()).unwrap());
        let loaded = reopened.load().unwrap();
        assert_eq!(loaded, sample_cart());
        assert_eq!(loaded.subtotal(), Decimal::new(3500, 2));
    }

    #[test]
    fn test_missing_or_corrupt_cart_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        let repo = CartRepository::new(store.clone());
        assert!(repo.load().unwrap().is_empty());

        store.set(CART_KEY, "{not json").unwrap();
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_saving_empty_cart_removes_entry() {
        let store = MemoryStore::new();
        let repo = CartRepository::new(store);
        repo.save(&sample_cart()).unwrap();
        assert!(!repo.load().unwrap().is_empty());

        repo.save(&Cart::new()).unwrap();
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_clear_removes_saved_cart() {
        let repo = CartRepository::new(MemoryStore::new());
        repo.save(&sample_cart()).unwrap();
        repo.clear().unwrap();
        assert_eq!(repo.load().unwrap(), Cart::new());
    }
}
