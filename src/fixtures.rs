use crate::model::{
    AttendanceRecord, AttendanceStatus, Audience, Book, CardStatus, HolderType, IdCard,
    InventoryItem, ItemCondition, Notice, PayStatus, SalaryPayment, SchoolClass, Student, Subject,
    Teacher,
};
use crate::store::Store;

/// Seeds the demo dataset the dashboard runs on. Ids are stable literals so
/// the UI and the integration tests can refer to them directly.
pub fn demo_store() -> Store {
    let mut store = Store::default();

    store.classes = vec![
        class("c5a", "5-A", 5, "t01"),
        class("c6a", "6-A", 6, "t02"),
        class("c7a", "7-A", 7, "t03"),
        class("c8a", "8-A", 8, "t04"),
    ];

    store.teachers = vec![
        teacher("t01", "Amina", "Baig", "STF001", "Class Teacher", 58000.0),
        teacher("t02", "Daniyal", "Chaudhry", "STF002", "Class Teacher", 56500.0),
        teacher("t03", "Farah", "Dar", "STF003", "Class Teacher", 57000.0),
        teacher("t04", "Hamza", "Farooqi", "STF004", "Class Teacher", 55500.0),
        teacher("t05", "Iqra", "Gill", "STF005", "Mathematics Teacher", 52000.0),
        teacher("t06", "Junaid", "Hashmi", "STF006", "English Teacher", 51000.0),
        teacher("t07", "Kiran", "Iqbal", "STF007", "Science Teacher", 53500.0),
        teacher("t08", "Luqman", "Javed", "STF008", "English Teacher", 49500.0),
        teacher("t09", "Mahnoor", "Khalid", "STF009", "Science Teacher", 50500.0),
        teacher("t10", "Nashit", "Lodhi", "STF010", "English Teacher", 48000.0),
        teacher("t11", "Omaima", "Malik", "STF011", "Science Teacher", 49000.0),
        teacher("t12", "Parvez", "Niazi", "STF012", "Mathematics Teacher", 54000.0),
    ];

    store.subjects = vec![
        subject("sub01", "Mathematics", "c5a", "t05"),
        subject("sub02", "English", "c5a", "t06"),
        subject("sub03", "Science", "c5a", "t07"),
        subject("sub04", "Mathematics", "c6a", "t01"),
        subject("sub05", "English", "c6a", "t08"),
        subject("sub06", "Science", "c6a", "t09"),
        subject("sub07", "Mathematics", "c7a", "t05"),
        subject("sub08", "English", "c7a", "t10"),
        subject("sub09", "Science", "c7a", "t11"),
        subject("sub10", "Mathematics", "c8a", "t12"),
        subject("sub11", "English", "c8a", "t06"),
        subject("sub12", "Science", "c8a", "t02"),
    ];

    let roster: [(&str, &str, &str, bool); 34] = [
        ("Areeba", "Abbasi", "c5a", true),
        ("Bilal", "Akhtar", "c5a", true),
        ("Dua", "Aslam", "c5a", true),
        ("Eshal", "Awan", "c5a", true),
        ("Fahad", "Bhatti", "c5a", true),
        ("Hira", "Butt", "c5a", true),
        ("Ibrahim", "Cheema", "c5a", true),
        ("Javeria", "Durrani", "c5a", true),
        ("Kamran", "Elahi", "c5a", true),
        ("Laiba", "Fazal", "c5a", false),
        ("Moiz", "Ghauri", "c6a", true),
        ("Nimra", "Haider", "c6a", true),
        ("Owais", "Hussain", "c6a", true),
        ("Pari", "Idrees", "c6a", true),
        ("Qasim", "Jamil", "c6a", true),
        ("Rida", "Kamal", "c6a", true),
        ("Saad", "Khan", "c6a", true),
        ("Tooba", "Latif", "c6a", true),
        ("Usman", "Mehmood", "c7a", true),
        ("Vaneeza", "Mirza", "c7a", true),
        ("Waleed", "Mughal", "c7a", true),
        ("Xainab", "Nadeem", "c7a", true),
        ("Yahya", "Omar", "c7a", true),
        ("Zara", "Paracha", "c7a", true),
        ("Ahsan", "Qureshi", "c7a", true),
        ("Bisma", "Raja", "c7a", true),
        ("Danish", "Rana", "c7a", false),
        ("Emaan", "Saeed", "c8a", true),
        ("Faris", "Shah", "c8a", true),
        ("Gul", "Sheikh", "c8a", true),
        ("Haris", "Siddiqui", "c8a", true),
        ("Inaya", "Tarar", "c8a", true),
        ("Jibran", "Usmani", "c8a", true),
        ("Khadija", "Wyne", "c8a", true),
    ];
    store.students = roster
        .iter()
        .enumerate()
        .map(|(i, (first, last, class_id, active))| Student {
            id: format!("s{:03}", i + 1),
            first_name: first.to_string(),
            last_name: last.to_string(),
            admission_no: format!("ADM{:04}", i + 1),
            class_id: class_id.to_string(),
            guardian_phone: format!("0300-555{:04}", 1200 + i),
            active: *active,
        })
        .collect();

    // June is fully settled; July is mid-run with five payments outstanding.
    for t in &store.teachers {
        store.salaries.push(SalaryPayment {
            id: format!("pay-202506-{}", t.id),
            teacher_id: t.id.clone(),
            month: "2025-06".to_string(),
            amount: t.monthly_salary,
            status: PayStatus::Paid,
        });
    }
    for t in &store.teachers {
        let paid = matches!(
            t.id.as_str(),
            "t01" | "t02" | "t03" | "t04" | "t05" | "t06" | "t07"
        );
        store.salaries.push(SalaryPayment {
            id: format!("pay-202507-{}", t.id),
            teacher_id: t.id.clone(),
            month: "2025-07".to_string(),
            amount: t.monthly_salary,
            status: if paid { PayStatus::Paid } else { PayStatus::Pending },
        });
    }

    for t in &store.teachers {
        let status = match t.id.as_str() {
            "t03" => AttendanceStatus::Absent,
            "t07" => AttendanceStatus::Late,
            "t09" => AttendanceStatus::Excused,
            _ => AttendanceStatus::Present,
        };
        store.attendance.push(AttendanceRecord {
            id: format!("att-20250701-{}", t.id),
            teacher_id: t.id.clone(),
            date: "2025-07-01".to_string(),
            status,
        });
    }
    for t in &store.teachers {
        let status = if t.id == "t05" {
            AttendanceStatus::Absent
        } else {
            AttendanceStatus::Present
        };
        store.attendance.push(AttendanceRecord {
            id: format!("att-20250702-{}", t.id),
            teacher_id: t.id.clone(),
            date: "2025-07-02".to_string(),
            status,
        });
    }

    store.inventory = vec![
        item("inv01", "Student Desk", "Furniture", 180, 4200.0, ItemCondition::Good),
        item("inv02", "Student Chair", "Furniture", 180, 1800.0, ItemCondition::Good),
        item("inv03", "Whiteboard", "Classroom", 12, 7500.0, ItemCondition::Good),
        item("inv04", "Projector", "Electronics", 4, 62000.0, ItemCondition::Repair),
        item("inv05", "Desktop Computer", "Electronics", 16, 85000.0, ItemCondition::Good),
        item("inv06", "Laser Printer", "Electronics", 2, 38000.0, ItemCondition::Repair),
        item("inv07", "Science Lab Kit", "Laboratory", 10, 15500.0, ItemCondition::Good),
        item("inv08", "Football Kit", "Sports", 3, 9000.0, ItemCondition::WrittenOff),
    ];

    store.books = vec![
        book("b01", "Oxford Mathematics 5", "P. Ahmed", "978-0-19-940101-1", "Mathematics", 40, 32),
        book("b02", "English Reader 5", "S. Rehman", "978-0-19-940102-8", "English", 40, 35),
        book("b03", "General Science 6", "N. Tariq", "978-0-19-940103-5", "Science", 38, 20),
        book("b04", "Oxford Mathematics 7", "P. Ahmed", "978-0-19-940104-2", "Mathematics", 36, 36),
        book("b05", "World Atlas", "Collins", "978-0-00-843612-3", "Reference", 10, 2),
        book("b06", "Urdu Adab 8", "R. Siddiqi", "978-969-35-3111-9", "Urdu", 30, 11),
        book("b07", "Computer Studies 8", "M. Aftab", "978-969-35-3112-6", "Computing", 24, 0),
        book("b08", "Islamiat 6", "A. Karim", "978-969-35-3113-3", "Islamiat", 38, 14),
    ];

    store.id_cards = vec![
        card("card01", HolderType::Student, "s001", Some("2025-04-10"), CardStatus::Issued),
        card("card02", HolderType::Student, "s002", Some("2025-04-10"), CardStatus::Issued),
        card("card03", HolderType::Student, "s003", None, CardStatus::Pending),
        card("card04", HolderType::Student, "s011", Some("2025-04-11"), CardStatus::Lost),
        card("card05", HolderType::Student, "s019", None, CardStatus::Pending),
        card("card06", HolderType::Student, "s028", Some("2025-04-12"), CardStatus::Issued),
        card("card07", HolderType::Staff, "t01", Some("2025-04-01"), CardStatus::Issued),
        card("card08", HolderType::Staff, "t05", Some("2025-04-01"), CardStatus::Issued),
        card("card09", HolderType::Staff, "t08", None, CardStatus::Pending),
        card("card10", HolderType::Staff, "t12", Some("2025-04-02"), CardStatus::Issued),
    ];

    store.notices = vec![
        notice(
            "n01",
            "Parent-Teacher Meeting",
            "PTM for all classes on the last Saturday of the month. Attendance registers must be up to date beforehand.",
            Audience::Teachers,
            "2025-07-18",
            true,
        ),
        notice(
            "n02",
            "Summer Uniform",
            "Summer uniform is in effect from Monday. Blazers are optional until further notice.",
            Audience::Students,
            "2025-07-14",
            false,
        ),
        notice(
            "n03",
            "Library Week",
            "Library week starts on the 21st. Issue limits are raised to three books per student.",
            Audience::All,
            "2025-07-10",
            false,
        ),
        notice(
            "n04",
            "Payroll Cut-off",
            "July payroll closes on the 28th. Report discrepancies to the office before then.",
            Audience::Teachers,
            "2025-07-08",
            false,
        ),
        notice(
            "n05",
            "Science Fair",
            "Entries for the inter-school science fair close Friday.",
            Audience::All,
            "2025-07-03",
            false,
        ),
    ];

    store
}

fn class(id: &str, name: &str, grade: i64, class_teacher_id: &str) -> SchoolClass {
    SchoolClass {
        id: id.to_string(),
        name: name.to_string(),
        grade,
        class_teacher_id: class_teacher_id.to_string(),
    }
}

fn teacher(
    id: &str,
    first: &str,
    last: &str,
    staff_no: &str,
    designation: &str,
    monthly_salary: f64,
) -> Teacher {
    Teacher {
        id: id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        staff_no: staff_no.to_string(),
        designation: designation.to_string(),
        monthly_salary,
        active: true,
    }
}

fn subject(id: &str, name: &str, class_id: &str, teacher_id: &str) -> Subject {
    Subject {
        id: id.to_string(),
        name: name.to_string(),
        class_id: class_id.to_string(),
        teacher_id: teacher_id.to_string(),
    }
}

fn item(
    id: &str,
    name: &str,
    category: &str,
    quantity: i64,
    unit_price: f64,
    condition: ItemCondition,
) -> InventoryItem {
    InventoryItem {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        quantity,
        unit_price,
        condition,
    }
}

fn book(
    id: &str,
    title: &str,
    author: &str,
    isbn: &str,
    category: &str,
    total_copies: i64,
    issued_copies: i64,
) -> Book {
    Book {
        id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        isbn: isbn.to_string(),
        category: category.to_string(),
        total_copies,
        issued_copies,
    }
}

fn card(
    id: &str,
    holder_type: HolderType,
    holder_id: &str,
    issued_on: Option<&str>,
    status: CardStatus,
) -> IdCard {
    IdCard {
        id: id.to_string(),
        holder_type,
        holder_id: holder_id.to_string(),
        issued_on: issued_on.map(|d| d.to_string()),
        status,
    }
}

fn notice(
    id: &str,
    title: &str,
    body: &str,
    audience: Audience,
    posted_on: &str,
    pinned: bool,
) -> Notice {
    Notice {
        id: id.to_string(),
        title: title.to_string(),
        body: body.to_string(),
        audience,
        posted_on: posted_on.to_string(),
        pinned,
    }
}
