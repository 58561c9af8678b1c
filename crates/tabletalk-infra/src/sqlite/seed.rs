//! Demo retail dataset.
//!
//! `ttalk init` seeds this small store database so the tool is usable
//! out of the box without pointing it at an existing file. Seeding is
//! idempotent: `IF NOT EXISTS` / `OR IGNORE` make a second run a no-op.

use super::pool::DatabasePool;

const SEED_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS customers (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    city TEXT,
    signup_date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    price REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS orders (
    id INTEGER PRIMARY KEY,
    customer_id INTEGER NOT NULL REFERENCES customers(id),
    order_date TEXT NOT NULL,
    status TEXT NOT NULL,
    total_amount REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS sales (
    id INTEGER PRIMARY KEY,
    order_id INTEGER NOT NULL REFERENCES orders(id),
    product_id INTEGER NOT NULL REFERENCES products(id),
    quantity INTEGER NOT NULL,
    unit_price REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS inventory (
    product_id INTEGER PRIMARY KEY REFERENCES products(id),
    stock INTEGER NOT NULL,
    restocked_at TEXT
);

INSERT OR IGNORE INTO customers (id, name, email, city, signup_date) VALUES
    (1, 'Alice Johnson', 'alice@example.com', 'Portland', '2024-01-15'),
    (2, 'Bob Martinez', 'bob@example.com', 'Austin', '2024-02-03'),
    (3, 'Carol Chen', 'carol@example.com', 'Seattle', '2024-02-21'),
    (4, 'David Okafor', 'david@example.com', 'Chicago', '2024-03-10'),
    (5, 'Elena Petrova', 'elena@example.com', 'Denver', '2024-04-05'),
    (6, 'Frank Lindqvist', 'frank@example.com', 'Portland', '2024-05-18'),
    (7, 'Grace Kim', 'grace@example.com', 'Austin', '2024-06-22'),
    (8, 'Hassan Ali', 'hassan@example.com', 'Seattle', '2024-07-30');

INSERT OR IGNORE INTO products (id, name, category, price) VALUES
    (1, 'Mechanical Keyboard', 'Electronics', 89.99),
    (2, 'Wireless Mouse', 'Electronics', 24.50),
    (3, 'Desk Lamp', 'Home Office', 34.00),
    (4, 'Notebook Set', 'Stationery', 12.75),
    (5, 'Monitor Stand', 'Home Office', 45.25),
    (6, 'USB-C Hub', 'Electronics', 59.90);

INSERT OR IGNORE INTO orders (id, customer_id, order_date, status, total_amount) VALUES
    (1, 1, '2024-03-01', 'delivered', 114.49),
    (2, 2, '2024-03-14', 'delivered', 89.99),
    (3, 3, '2024-04-02', 'delivered', 46.75),
    (4, 1, '2024-04-20', 'delivered', 59.90),
    (5, 4, '2024-05-05', 'shipped', 124.24),
    (6, 5, '2024-05-19', 'delivered', 24.50),
    (7, 6, '2024-06-08', 'delivered', 169.89),
    (8, 7, '2024-07-01', 'shipped', 34.00),
    (9, 2, '2024-07-15', 'pending', 102.65),
    (10, 8, '2024-08-02', 'pending', 89.99);

INSERT OR IGNORE INTO sales (id, order_id, product_id, quantity, unit_price) VALUES
    (1, 1, 1, 1, 89.99),
    (2, 1, 2, 1, 24.50),
    (3, 2, 1, 1, 89.99),
    (4, 3, 3, 1, 34.00),
    (5, 3, 4, 1, 12.75),
    (6, 4, 6, 1, 59.90),
    (7, 5, 5, 1, 45.25),
    (8, 5, 1, 1, 78.99),
    (9, 6, 2, 1, 24.50),
    (10, 7, 1, 1, 89.99),
    (11, 7, 6, 1, 59.90),
    (12, 7, 4, 1, 12.75),
    (13, 8, 3, 1, 34.00),
    (14, 9, 5, 1, 45.25),
    (15, 9, 6, 1, 57.40),
    (16, 10, 1, 1, 89.99);

INSERT OR IGNORE INTO inventory (product_id, stock, restocked_at) VALUES
    (1, 42, '2024-07-20'),
    (2, 120, '2024-07-20'),
    (3, 15, '2024-06-30'),
    (4, 200, '2024-08-01'),
    (5, 8, '2024-05-15'),
    (6, 64, '2024-07-28');
"#;

/// Create and populate the demo store schema.
pub async fn seed_demo(pool: &DatabasePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SEED_SQL).execute(&pool.writer).await?;
    tracing::info!("demo store database seeded");
    Ok(())
}
