//! Fixed tables backing the example network.
//!
//! Debts are stored as minor units (kopecks) and converted to two-place
//! decimals by the generator.

/// `(email, country, city, street, house_number)`
pub(crate) const CONTACTS: [(&str, &str, &str, &str, &str); 17] = [
    // factories
    ("factory@xiaomi.cn", "Китай", "Пекин", "Улица Технологий", "1"),
    ("factory@samsung.kr", "Южная Корея", "Сеул", "Digital Street", "100"),
    ("factory@sony.jp", "Япония", "Токио", "Shinjuku", "5-10-15"),
    // retail chains
    ("info@mvideo.ru", "Россия", "Москва", "Ленинградское шоссе", "16"),
    ("contact@eldorado.ru", "Россия", "Москва", "Улица 1905 года", "25"),
    ("info@dns-shop.ru", "Россия", "Владивосток", "Светланская", "45"),
    ("info@citilink.ru", "Россия", "Санкт-Петербург", "Невский проспект", "50"),
    ("info@technopoint.ru", "Россия", "Екатеринбург", "Ленина", "25"),
    // sole proprietors
    ("ip.ivanov@mail.ru", "Россия", "Новосибирск", "Красный проспект", "120"),
    ("ip.petrov@yandex.ru", "Россия", "Казань", "Баумана", "15"),
    ("ip.sidorov@gmail.com", "Россия", "Нижний Новгород", "Большая Покровская", "30"),
    ("ip.smirnov@list.ru", "Россия", "Самара", "Московское шоссе", "18"),
    ("ip.kuznetsov@bk.ru", "Россия", "Ростов-на-Дону", "Буденновский", "55"),
    ("ip.popov@mail.ru", "Россия", "Уфа", "Октября", "82"),
    ("ip.vasiliev@yandex.ru", "Россия", "Красноярск", "Мира", "45"),
    // spare contacts
    ("shop@technodom.kz", "Казахстан", "Алматы", "Абая", "150"),
    ("info@technoplus.by", "Беларусь", "Минск", "Независимости", "85"),
];

/// `(name, model, (year, month, day))`
pub(crate) const PRODUCTS: [(&str, &str, (i32, u32, u32)); 20] = [
    ("Xiaomi 14 Ultra", "23113RKC6G", (2024, 2, 22)),
    ("Xiaomi 14", "23127PCC0G", (2024, 2, 22)),
    ("Redmi Note 13 Pro", "2312DRAABG", (2024, 1, 15)),
    ("Redmi Note 13", "23129RAA4G", (2024, 1, 15)),
    ("POCO X6 Pro", "2311DRK48G", (2024, 1, 12)),
    ("Samsung Galaxy S24 Ultra", "SM-S928B", (2024, 1, 31)),
    ("Samsung Galaxy S24+", "SM-S926B", (2024, 1, 31)),
    ("Samsung Galaxy S24", "SM-S921B", (2024, 1, 31)),
    ("Samsung Galaxy Z Fold5", "SM-F946B", (2023, 8, 11)),
    ("Samsung Galaxy Z Flip5", "SM-F731B", (2023, 8, 11)),
    ("Sony Xperia 1 V", "XQ-DQ72", (2023, 7, 28)),
    ("Sony Xperia 5 V", "XQ-DE72", (2023, 9, 15)),
    ("Sony Xperia 10 V", "XQ-DC72", (2023, 6, 15)),
    ("Xiaomi Book S 12.4", "230502FP", (2023, 12, 1)),
    ("Samsung Galaxy Book4 Pro", "NP960XGL", (2024, 1, 15)),
    ("Sony VAIO SX14", "VJS141", (2023, 10, 20)),
    ("Xiaomi Smart Band 8 Pro", "M2233B1", (2023, 10, 26)),
    ("Samsung Galaxy Watch6", "SM-R940", (2023, 8, 11)),
    ("Sony WH-1000XM5", "WH1000XM5", (2022, 5, 20)),
    ("Xiaomi Electric Scooter 4 Pro", "DDHBC02MN", (2023, 3, 15)),
];

/// A factory with a fixed catalogue. Factories owe nothing.
pub(crate) struct FactoryRow {
    pub(crate) name: &'static str,
    pub(crate) contact: usize,
    pub(crate) products: &'static [usize],
}

pub(crate) const FACTORIES: [FactoryRow; 3] = [
    FactoryRow {
        name: "Xiaomi Manufacturing Plant",
        contact: 0,
        products: &[0, 1, 2, 3, 4, 13, 16, 18],
    },
    FactoryRow {
        name: "Samsung Electronics Factory",
        contact: 1,
        products: &[5, 6, 7, 8, 9, 14, 17],
    },
    FactoryRow {
        name: "Sony Production Facility",
        contact: 2,
        products: &[10, 11, 12, 15],
    },
];

/// A downstream node: `supplier` indexes the previous tier.
pub(crate) struct DownstreamRow {
    pub(crate) name: &'static str,
    pub(crate) contact: usize,
    pub(crate) supplier: usize,
    pub(crate) debt_minor: i64,
}

pub(crate) const RETAILERS: [DownstreamRow; 5] = [
    DownstreamRow {
        name: "М.Видео",
        contact: 3,
        supplier: 0,
        debt_minor: 150_000_050,
    },
    DownstreamRow {
        name: "Эльдорадо",
        contact: 4,
        supplier: 0,
        debt_minor: 230_000_075,
    },
    DownstreamRow {
        name: "DNS",
        contact: 5,
        supplier: 1,
        debt_minor: 320_000_025,
    },
    DownstreamRow {
        name: "Ситилинк",
        contact: 6,
        supplier: 1,
        debt_minor: 180_000_000,
    },
    DownstreamRow {
        name: "Технопоинт",
        contact: 7,
        supplier: 2,
        debt_minor: 95_000_030,
    },
];

pub(crate) const ENTREPRENEURS: [DownstreamRow; 7] = [
    DownstreamRow {
        name: "ИП Иванов А.А.",
        contact: 8,
        supplier: 0,
        debt_minor: 25_000_045,
    },
    DownstreamRow {
        name: "ИП Петров Б.Б.",
        contact: 9,
        supplier: 1,
        debt_minor: 18_000_090,
    },
    DownstreamRow {
        name: "ИП Сидоров В.В.",
        contact: 10,
        supplier: 2,
        debt_minor: 32_000_015,
    },
    DownstreamRow {
        name: "ИП Смирнов Г.Г.",
        contact: 11,
        supplier: 3,
        debt_minor: 15_000_000,
    },
    DownstreamRow {
        name: "ИП Кузнецов Д.Д.",
        contact: 12,
        supplier: 4,
        debt_minor: 21_000_030,
    },
    DownstreamRow {
        name: "ИП Попов Е.Е.",
        contact: 13,
        supplier: 0,
        debt_minor: 12_000_060,
    },
    DownstreamRow {
        name: "ИП Васильев Ж.Ж.",
        contact: 14,
        supplier: 2,
        debt_minor: 19_500_025,
    },
];
