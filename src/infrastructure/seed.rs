use sea_orm::*;

use crate::models::{author, book, book_genres, book_instance, genre};

// Demo catalog: a handful of authors, genres, books and copies so a fresh
// install has something to browse. Assumes an empty database.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let now = chrono::Utc::now().to_rfc3339();

    let authors = [
        ("Patrick", "Rothfuss", Some("1973-06-06"), None),
        ("Ben", "Bova", Some("1932-11-08"), Some("2020-11-29")),
        ("Isaac", "Asimov", Some("1920-01-02"), Some("1992-04-06")),
        ("Bob", "Billings", None, None),
    ];

    let mut author_ids = Vec::new();
    for (first_name, family_name, date_of_birth, date_of_death) in authors {
        let author = author::ActiveModel {
            first_name: Set(first_name.to_owned()),
            family_name: Set(family_name.to_owned()),
            date_of_birth: Set(date_of_birth.map(str::to_owned)),
            date_of_death: Set(date_of_death.map(str::to_owned)),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };
        let res = author::Entity::insert(author).exec(db).await?;
        author_ids.push(res.last_insert_id);
    }

    let mut genre_ids = Vec::new();
    for name in ["Fantasy", "Science Fiction", "French Poetry"] {
        let genre = genre::ActiveModel {
            name: Set(name.to_owned()),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };
        let res = genre::Entity::insert(genre).exec(db).await?;
        genre_ids.push(res.last_insert_id);
    }

    // (title, author index, summary, isbn, genre indexes)
    let books: [(&str, usize, &str, &str, &[usize]); 4] = [
        (
            "The Name of the Wind (The Kingkiller Chronicle, #1)",
            0,
            "I have stolen princesses back from sleeping barrow kings. I burned down the town of Trebon. I have spent the night with Felurian and left with both my sanity and my life. I was expelled from the University at a younger age than most people are allowed in. I tread paths by moonlight that others fear to speak of during day. I have talked to Gods, loved women, and written songs that make the minstrels weep.",
            "9781473211896",
            &[0],
        ),
        (
            "The Wise Man's Fear (The Kingkiller Chronicle, #2)",
            0,
            "Picking up the tale of Kvothe Kingkiller once again, we follow him into exile, into political intrigue, courtship, adventure, love and magic.",
            "9788401352836",
            &[0],
        ),
        (
            "Apes and Angels",
            1,
            "Humankind headed out to the stars not for conquest, nor exploration, nor even for curiosity. Humans went to the stars in a desperate crusade to save intelligent life wherever they found it.",
            "9780765379528",
            &[1],
        ),
        (
            "The Slip",
            2,
            "The Slip is the story of a depressed playwright who finds fame and fortune almost crushed out of him.",
            "9780765379504",
            &[1],
        ),
    ];

    let mut book_ids = Vec::new();
    for (title, author_idx, summary, isbn, genres) in books {
        let book = book::ActiveModel {
            title: Set(title.to_owned()),
            author_id: Set(author_ids[author_idx]),
            summary: Set(summary.to_owned()),
            isbn: Set(isbn.to_owned()),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };
        let res = book::Entity::insert(book).exec(db).await?;
        book_ids.push(res.last_insert_id);

        for genre_idx in genres {
            let link = book_genres::ActiveModel {
                book_id: Set(res.last_insert_id),
                genre_id: Set(genre_ids[*genre_idx]),
            };
            book_genres::Entity::insert(link).exec(db).await?;
        }
    }

    // (book index, imprint, status, due_back)
    let instances = [
        (0, "London Gollancz, 2014.", "Available", None),
        (1, "Gollancz, 2011.", "Loaned", Some("2026-08-28")),
        (2, "New York Tom Doherty Associates, 2016.", "Available", None),
        (3, "New York Tom Doherty Associates, 2016.", "Maintenance", None),
        (3, "New York Tom Doherty Associates, 2016.", "Loaned", Some("2026-09-14")),
    ];

    for (book_idx, imprint, status, due_back) in instances {
        let instance = book_instance::ActiveModel {
            book_id: Set(book_ids[book_idx]),
            imprint: Set(imprint.to_owned()),
            status: Set(status.to_owned()),
            due_back: Set(due_back.map(str::to_owned)),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };
        book_instance::Entity::insert(instance).exec(db).await?;
    }

    Ok(())
}
